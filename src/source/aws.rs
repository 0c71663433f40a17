//! `aws ec2 describe-security-groups` output.
//!
//! JSON shape (only the fields we read):
//! {
//!   "SecurityGroups": [
//!     {
//!       "GroupId": "sg-0a1b",
//!       "GroupName": "Db",
//!       "VpcId": "vpc-1234",
//!       "IpPermissions": [
//!         {
//!           "IpProtocol": "tcp", "FromPort": 22, "ToPort": 22,
//!           "UserIdGroupPairs": [{ "GroupId": "sg-9f8e" }],
//!           "IpRanges": [{ "CidrIp": "10.0.0.0/8" }],
//!           "Ipv6Ranges": [{ "CidrIpv6": "::/0" }]
//!         }
//!       ]
//!     }
//!   ]
//! }
//!
//! Group pairs usually carry only a `GroupId`; we name them after the group
//! with that id in the same document when there is one.

use crate::Result;
use crate::model::{IngressRule, SecurityGroup};
use crate::source::check_group_names;
use anyhow::bail;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSecurityGroups {
    pub security_groups: Vec<RawGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawGroup {
    #[serde(default)]
    pub group_id: Option<String>,

    #[serde(default)]
    pub group_name: String,

    #[serde(default)]
    pub vpc_id: Option<String>,

    #[serde(default)]
    pub ip_permissions: Vec<RawPermission>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPermission {
    #[serde(default)]
    pub ip_protocol: Option<String>,

    #[serde(default)]
    pub from_port: Option<i64>,

    #[serde(default)]
    pub to_port: Option<i64>,

    #[serde(default)]
    pub user_id_group_pairs: Vec<RawGroupPair>,

    #[serde(default)]
    pub ip_ranges: Vec<RawIpRange>,

    #[serde(default)]
    pub ipv6_ranges: Vec<RawIpv6Range>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawGroupPair {
    #[serde(default)]
    pub group_id: Option<String>,

    #[serde(default)]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIpRange {
    pub cidr_ip: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawIpv6Range {
    pub cidr_ipv6: String,
}

impl RawPermission {
    /// "22" for a single port, "8000-8080" for a range, "all" otherwise.
    ///
    /// Negative ports (ICMP's "any code" is -1) count as unset.
    fn port(&self) -> String {
        if self.ip_protocol.as_deref() == Some("-1") {
            return "all".to_string();
        }
        let from = self.from_port.filter(|p| *p >= 0);
        let to = self.to_port.filter(|p| *p >= 0);
        match (from, to) {
            (Some(from), Some(to)) if from == to => from.to_string(),
            (Some(from), Some(to)) => format!("{}-{}", from, to),
            (Some(port), None) | (None, Some(port)) => port.to_string(),
            (None, None) => "all".to_string(),
        }
    }
}

impl DescribeSecurityGroups {
    /// Normalize into the model, keeping document order.
    ///
    /// - group names must be non-empty and unique
    /// - `vpc` keeps only groups in that VPC; pair names still resolve
    ///   against the whole document
    pub fn validate_and_build(&self, vpc: Option<&str>) -> Result<Vec<SecurityGroup>> {
        check_group_names(
            self.security_groups
                .iter()
                .map(|raw| (raw.group_name.as_str(), raw.group_id.as_deref())),
        )?;

        // Id -> name over the whole document.
        let mut names_by_id: BTreeMap<&str, &str> = BTreeMap::new();
        for raw in &self.security_groups {
            if let Some(id) = &raw.group_id {
                names_by_id.insert(id.as_str(), raw.group_name.as_str());
            }
        }

        let mut out = Vec::new();
        for raw in &self.security_groups {
            if let Some(want) = vpc {
                if raw.vpc_id.as_deref() != Some(want) {
                    debug!(group = %raw.group_name, vpc = ?raw.vpc_id, "outside requested vpc");
                    continue;
                }
            }

            let mut ingress = Vec::new();
            for perm in &raw.ip_permissions {
                let port = perm.port();

                for pair in &perm.user_id_group_pairs {
                    let source = match (&pair.group_name, &pair.group_id) {
                        (Some(name), _) => name.as_str(),
                        (None, Some(id)) => names_by_id
                            .get(id.as_str())
                            .copied()
                            .unwrap_or(id.as_str()),
                        (None, None) => bail!(
                            "security group {}: group pair without GroupName or GroupId",
                            raw.group_name
                        ),
                    };
                    ingress.push(IngressRule::group(port.clone(), source));
                }
                for range in &perm.ip_ranges {
                    ingress.push(IngressRule::cidr(port.clone(), &range.cidr_ip));
                }
                for range in &perm.ipv6_ranges {
                    ingress.push(IngressRule::cidr(port.clone(), &range.cidr_ipv6));
                }
            }

            out.push(SecurityGroup::new(&raw.group_name, ingress));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> DescribeSecurityGroups {
        serde_json::from_str(text).unwrap()
    }

    const DOC: &str = r#"{
        "SecurityGroups": [
            {
                "GroupId": "sg-web",
                "GroupName": "Web",
                "VpcId": "vpc-a",
                "IpPermissions": [
                    {
                        "IpProtocol": "tcp", "FromPort": 80, "ToPort": 80,
                        "UserIdGroupPairs": [{"GroupId": "sg-elb", "UserId": "123"}],
                        "IpRanges": [{"CidrIp": "10.0.0.0/8", "Description": "office"}],
                        "Ipv6Ranges": [{"CidrIpv6": "::/0"}],
                        "PrefixListIds": []
                    }
                ]
            },
            {
                "GroupId": "sg-db",
                "GroupName": "Db",
                "VpcId": "vpc-b",
                "IpPermissions": [
                    {
                        "IpProtocol": "tcp", "FromPort": 7474, "ToPort": 7474,
                        "UserIdGroupPairs": [{"GroupId": "sg-web"}]
                    },
                    {
                        "IpProtocol": "tcp", "FromPort": 8000, "ToPort": 8080,
                        "UserIdGroupPairs": [{"GroupId": "sg-x", "GroupName": "Named"}]
                    },
                    {
                        "IpProtocol": "-1",
                        "IpRanges": [{"CidrIp": "127.0.0.1/32"}]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn normalizes_rules_in_permission_order() {
        let groups = parse(DOC).validate_and_build(None).unwrap();

        assert_eq!(
            groups,
            vec![
                SecurityGroup::new(
                    "Web",
                    vec![
                        IngressRule::group("80", "sg-elb"),
                        IngressRule::cidr("80", "10.0.0.0/8"),
                        IngressRule::cidr("80", "::/0"),
                    ],
                ),
                SecurityGroup::new(
                    "Db",
                    vec![
                        IngressRule::group("7474", "Web"),
                        IngressRule::group("8000-8080", "Named"),
                        IngressRule::cidr("all", "127.0.0.1/32"),
                    ],
                ),
            ]
        );
    }

    #[test]
    fn vpc_filter_keeps_cross_vpc_names() {
        let groups = parse(DOC).validate_and_build(Some("vpc-b")).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Db");
        assert_eq!(groups[0].ingress[0], IngressRule::group("7474", "Web"));
    }

    #[test]
    fn unknown_vpc_yields_nothing() {
        assert!(parse(DOC).validate_and_build(Some("vpc-z")).unwrap().is_empty());
    }

    #[test]
    fn missing_group_name_is_an_error() {
        let doc = parse(r#"{"SecurityGroups": [{"GroupId": "sg-1"}]}"#);
        let err = doc.validate_and_build(None).unwrap_err();
        assert!(err.to_string().contains("sg-1"));
    }

    #[test]
    fn duplicate_group_name_is_an_error() {
        let doc = parse(
            r#"{"SecurityGroups": [
                {"GroupId": "sg-1", "GroupName": "Web"},
                {"GroupId": "sg-2", "GroupName": "Web"}
            ]}"#,
        );
        assert!(doc.validate_and_build(None).is_err());
    }

    #[test]
    fn anonymous_group_pair_is_an_error() {
        let doc = parse(
            r#"{"SecurityGroups": [
                {"GroupName": "Web", "IpPermissions": [
                    {"FromPort": 80, "ToPort": 80, "UserIdGroupPairs": [{"UserId": "1"}]}
                ]}
            ]}"#,
        );
        let err = doc.validate_and_build(None).unwrap_err();
        assert!(err.to_string().contains("Web"));
    }

    #[test]
    fn port_shapes() {
        let perm = |proto: Option<&str>, from: Option<i64>, to: Option<i64>| RawPermission {
            ip_protocol: proto.map(str::to_string),
            from_port: from,
            to_port: to,
            user_id_group_pairs: vec![],
            ip_ranges: vec![],
            ipv6_ranges: vec![],
        };

        assert_eq!(perm(Some("tcp"), Some(22), Some(22)).port(), "22");
        assert_eq!(perm(Some("udp"), Some(1000), Some(2000)).port(), "1000-2000");
        assert_eq!(perm(Some("-1"), None, None).port(), "all");
        assert_eq!(perm(Some("-1"), Some(-1), Some(-1)).port(), "all");
        assert_eq!(perm(None, None, None).port(), "all");
        assert_eq!(perm(Some("icmp"), Some(8), Some(-1)).port(), "8");
        assert_eq!(perm(Some("icmp"), Some(-1), Some(-1)).port(), "all");
        assert_eq!(perm(Some("icmpv6"), Some(-1), Some(128)).port(), "128");
    }
}
