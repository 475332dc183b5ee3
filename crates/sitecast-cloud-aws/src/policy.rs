//! Bucket policy documents.

use serde_json::{Value, json};

/// Public-read policy for a website bucket: anonymous `GetObject` on every
/// key, nothing else.
pub fn public_read_policy(bucket: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Action": ["s3:GetObject"],
                "Effect": "Allow",
                "Principal": "*",
                "Resource": [format!("arn:aws:s3:::{bucket}/*")],
            }
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_read_policy_shape() {
        let policy = public_read_policy("example.com");

        assert_eq!(policy["Version"], "2012-10-17");

        let statement = &policy["Statement"][0];
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"], "*");
        assert_eq!(statement["Action"][0], "s3:GetObject");
        assert_eq!(statement["Resource"][0], "arn:aws:s3:::example.com/*");
    }

    #[test]
    fn test_policy_scopes_to_objects_not_bucket() {
        let policy = public_read_policy("my-bucket");
        let resource = policy["Statement"][0]["Resource"][0]
            .as_str()
            .unwrap();
        assert!(resource.ends_with("/*"));
    }
}
