use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Identity-provider ARN and role ARN recovered from the SAML assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleArnPair {
    pub principal_arn: String,
    pub role_arn: String,
}

impl RoleArnPair {
    /// Parse an `AttributeValue` of the AWS role attribute.
    /// AWS accepts either ordering, so the role half is detected by `:role/`.
    pub fn parse(arn_pair: &str) -> Option<Self> {
        let parts: Vec<&str> = arn_pair.split(',').map(str::trim).collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        let (role_arn, principal_arn) = if parts[0].contains(":role/") {
            (parts[0].to_string(), parts[1].to_string())
        } else {
            (parts[1].to_string(), parts[0].to_string())
        };

        Some(Self {
            principal_arn,
            role_arn,
        })
    }

    /// Role name from the ARN (arn:aws:iam::123456789012:role/RoleName)
    pub fn role_name(&self) -> &str {
        role_name_from_arn(&self.role_arn)
    }
}

impl fmt::Display for RoleArnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.principal_arn, self.role_arn)
    }
}

/// Role listed in the user's application profile (`samlRoles`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEntry {
    pub display: String,
}

impl RoleEntry {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
        }
    }

    /// Name to look for in the assertion.
    ///
    /// Okta may store either bare role names or full `provider,role` ARN pairs
    /// in `samlRoles`; for pairs the role ARN's last path segment is used.
    pub fn role_name(&self) -> &str {
        let parts: Vec<&str> = self.display.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [first, second] => {
                let role_arn = if first.contains(":role/") {
                    *first
                } else {
                    *second
                };
                role_name_from_arn(role_arn)
            }
            _ => self.display.trim(),
        }
    }

    /// Full role ARN when the entry is a `provider,role` pair.
    pub fn role_arn(&self) -> Option<String> {
        RoleArnPair::parse(&self.display).map(|pair| pair.role_arn)
    }
}

impl fmt::Display for RoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Pick an entry by zero-based index, rejecting anything past the end.
pub fn select<T>(entries: &[T], index: usize) -> Result<&T> {
    entries.get(index).ok_or(Error::OutOfRange {
        index,
        len: entries.len(),
    })
}

fn role_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "arn:aws:iam::111:saml-provider/Okta,arn:aws:iam::111:role/Admin";

    #[test]
    fn test_pair_from_attribute_value() {
        let pair = RoleArnPair::parse(ADMIN).unwrap();
        assert_eq!(pair.principal_arn, "arn:aws:iam::111:saml-provider/Okta");
        assert_eq!(pair.role_arn, "arn:aws:iam::111:role/Admin");
        assert_eq!(pair.role_name(), "Admin");
        assert_eq!(pair.to_string(), ADMIN);
    }

    #[test]
    fn test_pair_reversed_order() {
        let pair = RoleArnPair::parse(
            "arn:aws:iam::123456789012:role/MyRole,arn:aws:iam::123456789012:saml-provider/MyProvider",
        )
        .unwrap();
        assert_eq!(pair.role_arn, "arn:aws:iam::123456789012:role/MyRole");
        assert_eq!(
            pair.principal_arn,
            "arn:aws:iam::123456789012:saml-provider/MyProvider"
        );
    }

    #[test]
    fn test_pair_rejects_malformed_values() {
        assert!(RoleArnPair::parse("arn:aws:iam::111:role/Admin").is_none());
        assert!(RoleArnPair::parse("a,b,c").is_none());
        assert!(RoleArnPair::parse(",arn:aws:iam::111:role/Admin").is_none());
    }

    #[test]
    fn test_role_entry_name() {
        assert_eq!(RoleEntry::new(ADMIN).role_name(), "Admin");
        assert_eq!(RoleEntry::new("ReadOnly").role_name(), "ReadOnly");
        assert_eq!(
            RoleEntry::new("arn:aws:iam::111:role/team/Deploy,arn:aws:iam::111:saml-provider/Okta")
                .role_name(),
            "Deploy"
        );
    }

    #[test]
    fn test_role_entry_arn() {
        assert_eq!(
            RoleEntry::new(ADMIN).role_arn().as_deref(),
            Some("arn:aws:iam::111:role/Admin")
        );
        assert_eq!(RoleEntry::new("ReadOnly").role_arn(), None);
    }

    #[test]
    fn test_select_within_bounds() {
        let entries = vec![RoleEntry::new("Admin"), RoleEntry::new("ReadOnly")];
        assert_eq!(select(&entries, 0).unwrap().display, "Admin");
        assert_eq!(select(&entries, 1).unwrap().display, "ReadOnly");
    }

    #[test]
    fn test_select_rejects_index_equal_to_len() {
        let entries = vec![RoleEntry::new("Admin"), RoleEntry::new("ReadOnly")];
        match select(&entries, 2) {
            Err(Error::OutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("Expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_select_on_empty() {
        let entries: Vec<RoleEntry> = Vec::new();
        assert!(matches!(
            select(&entries, 0),
            Err(Error::OutOfRange { index: 0, len: 0 })
        ));
    }
}
