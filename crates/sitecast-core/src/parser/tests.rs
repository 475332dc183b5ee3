use super::*;
use crate::error::SiteError;

#[test]
fn test_parse_minimal_site() {
    let kdl = r#"
        site "example.com"
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert_eq!(site.domain, "example.com");
    assert_eq!(site.source_dir.to_str(), Some("./site"));
    assert_eq!(site.index_document, "index.html");
    assert_eq!(site.error_document, "404.html");
    assert!(!site.force_destroy);
    assert_eq!(site.provider.name, "aws");
    assert_eq!(site.provider.region, "us-east-1");
    assert!(site.certificate.is_none());
    assert!(site.distribution.is_none());
}

#[test]
fn test_parse_full_site() {
    let kdl = r#"
        site "example.com" {
            source "./public"
            index "home.html"
            error "oops.html"
            force-destroy

            provider "aws" {
                region "us-west-2"
            }

            certificate

            distribution {
                price-class "PriceClass_200"
            }
        }
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert_eq!(site.domain, "example.com");
    assert_eq!(site.source_dir.to_str(), Some("./public"));
    assert_eq!(site.index_document, "home.html");
    assert_eq!(site.error_document, "oops.html");
    assert!(site.force_destroy);
    assert_eq!(site.provider.region, "us-west-2");

    let certificate = site.certificate.unwrap();
    assert_eq!(certificate.validation_method, "DNS");

    let distribution = site.distribution.unwrap();
    assert_eq!(distribution.price_class, "PriceClass_200");
}

#[test]
fn test_parse_site_snake_case_settings() {
    let kdl = r#"
        site "example.com" {
            source_dir "./dist"
            index_document "index.htm"
            error_document "error.htm"
            force_destroy #true
        }
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert_eq!(site.source_dir.to_str(), Some("./dist"));
    assert_eq!(site.index_document, "index.htm");
    assert_eq!(site.error_document, "error.htm");
    assert!(site.force_destroy);
}

#[test]
fn test_parse_force_destroy_explicit_false() {
    let kdl = r#"
        site "example.com" {
            force-destroy #false
        }
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert!(!site.force_destroy);
}

#[test]
fn test_parse_certificate_validation_method() {
    let kdl = r#"
        site "example.com" {
            certificate {
                validation "DNS"
            }
        }
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert_eq!(site.certificate.unwrap().validation_method, "DNS");
}

#[test]
fn test_parse_missing_site_node_fails() {
    let err = parse_site_string("provider \"aws\"").unwrap_err();
    assert!(matches!(err, SiteError::InvalidConfig(_)));
}

#[test]
fn test_parse_site_without_domain_fails() {
    let err = parse_site_string("site").unwrap_err();
    assert!(matches!(err, SiteError::InvalidConfig(_)));
}

#[test]
fn test_parse_invalid_kdl_fails() {
    let err = parse_site_string("site \"example.com\" {").unwrap_err();
    assert!(matches!(err, SiteError::KdlParse(_)));
}

#[test]
fn test_parse_unknown_settings_are_ignored() {
    let kdl = r#"
        site "example.com" {
            comment "not a real setting"
        }
    "#;

    let site = parse_site_string(kdl).unwrap();
    assert_eq!(site.domain, "example.com");
}
