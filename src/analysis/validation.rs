use crate::config::AnalysisConfig;
use crate::models::IntegrabilityReport;

/// Pre-flight boundedness check on the configured domain and attenuation.
///
/// Reads the configuration as given without validating it first, so a
/// violated bound is reported rather than raised.
pub fn check_integrability_conditions(config: &AnalysisConfig) -> IntegrabilityReport {
    let finite_domain_ok = config.region_radius_m > 0.0 && config.density > 0.0;
    let asymptotic_domain_ok = config.kernel_alpha > 0.0 && config.admittance_s >= 0.0;

    let mut details = if finite_domain_ok {
        "Finite-domain conditions satisfied.".to_string()
    } else {
        "Finite-domain conditions violated.".to_string()
    };
    if asymptotic_domain_ok {
        details.push_str(" Asymptotic attenuation condition satisfied.");
    } else {
        details.push_str(" Asymptotic attenuation condition violated.");
    }

    IntegrabilityReport {
        finite_domain_ok,
        asymptotic_domain_ok,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_integrable() {
        let report = check_integrability_conditions(&AnalysisConfig::default());
        assert!(report.is_ok());
        assert_eq!(
            report.details,
            "Finite-domain conditions satisfied. Asymptotic attenuation condition satisfied."
        );
    }

    #[test]
    fn negative_admittance_breaks_the_asymptotic_condition() {
        let report = check_integrability_conditions(&AnalysisConfig {
            admittance_s: -0.01,
            ..AnalysisConfig::default()
        });
        assert!(report.finite_domain_ok);
        assert!(!report.asymptotic_domain_ok);
        assert!(report.details.ends_with("condition violated."));
    }

    #[test]
    fn empty_region_breaks_the_finite_domain_condition() {
        let report = check_integrability_conditions(&AnalysisConfig {
            region_radius_m: 0.0,
            ..AnalysisConfig::default()
        });
        assert!(!report.finite_domain_ok);
        assert!(report.details.starts_with("Finite-domain conditions violated."));
    }
}
