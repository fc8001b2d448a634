use crate::monitor::constants::DEFAULT_SECONDARY_TARGET;

/// A monitored endpoint and the labels it is shown with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Address or host name, as given to the sample source
    pub address: String,
    /// Role shown in the header, e.g. `gateway`
    pub role: String,
    /// Short name used in the legend, e.g. `Gateway`
    pub legend: String,
}

impl Target {
    /// Label a target by its position in the target list
    pub fn for_position(address: impl Into<String>, position: usize) -> Self {
        let address = address.into();
        let (role, legend) = match position {
            0 => ("gateway".to_string(), "Gateway".to_string()),
            1 if address == DEFAULT_SECONDARY_TARGET => {
                ("CloudFlare DNS".to_string(), "CloudFlare".to_string())
            }
            n => (format!("target {}", n + 1), format!("Target {}", n + 1)),
        };
        Self {
            address,
            role,
            legend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles() {
        let gateway = Target::for_position("192.168.1.1", 0);
        assert_eq!(gateway.role, "gateway");
        assert_eq!(gateway.legend, "Gateway");

        let resolver = Target::for_position("1.1.1.1", 1);
        assert_eq!(resolver.role, "CloudFlare DNS");
        assert_eq!(resolver.legend, "CloudFlare");
    }

    #[test]
    fn test_generic_roles() {
        let custom = Target::for_position("9.9.9.9", 1);
        assert_eq!(custom.role, "target 2");
        assert_eq!(custom.legend, "Target 2");

        let third = Target::for_position("8.8.8.8", 2);
        assert_eq!(third.legend, "Target 3");
    }
}
