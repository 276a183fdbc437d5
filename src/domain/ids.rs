//! Entity Identifiers
//!
//! Cheap-to-clone newtypes so a location id can never be passed where a device id
//! is expected.

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub std::sync::Arc<str>);

        impl $name {
            pub fn new(id: impl Into<std::sync::Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a company
    CompanyId
);
entity_id!(
    /// Unique identifier for a location (site)
    LocationId
);
entity_id!(
    /// Unique identifier for a device
    DeviceId
);
entity_id!(StaffId);
entity_id!(ReportId);
entity_id!(AlertId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = DeviceId::from("dev-downtown-1");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"dev-downtown-1\"");
        let parsed: LocationId = serde_json::from_str("\"loc-greenleaf-downtown\"").expect("parse");
        assert_eq!(parsed.as_str(), "loc-greenleaf-downtown");
    }
}
