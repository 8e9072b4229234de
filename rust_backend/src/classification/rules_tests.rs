#[cfg(test)]
mod tests {
    use crate::classification::rules::{classify, classify_code, normalize_label, Rule};
    use crate::classification::{BreakpointError, Breakpoints, Classifier};
    use crate::core::classes::{ClassScheme, HealthClass};

    /// Every code in range maps to the label at its ordinal position
    #[test]
    fn test_numeric_codes_map_by_position() {
        for scheme in [ClassScheme::Five, ClassScheme::Seven] {
            for (i, expected) in scheme.classes().iter().enumerate() {
                let code = (i + 1).to_string();
                assert_eq!(classify(Some(&code), scheme), *expected, "code {}", code);
            }
            let past_end = (scheme.size() + 1).to_string();
            assert_eq!(classify(Some(&past_end), scheme), HealthClass::NoData);
            assert_eq!(classify(Some("0"), scheme), HealthClass::NoData);
        }
    }

    /// Float-formatted codes come from numeric CSV columns
    #[test]
    fn test_float_formatted_codes() {
        assert_eq!(classify(Some("3.0"), ClassScheme::Five), HealthClass::Medium);
        assert_eq!(classify(Some(" 5 "), ClassScheme::Five), HealthClass::High);
        assert_eq!(classify(Some("2.5"), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some("NaN"), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify_code(4.0, ClassScheme::Seven), HealthClass::Medium);
        assert_eq!(classify_code(f64::NAN, ClassScheme::Seven), HealthClass::NoData);
    }

    /// Spelling variants of Medium-High never collapse to Medium or High
    #[test]
    fn test_medium_high_variants() {
        for variant in ["Medio-alto", "Medio alto", "Medium-High", "medium_high", "MEDIO  ALTO"] {
            assert_eq!(
                classify(Some(variant), ClassScheme::Five),
                HealthClass::MediumHigh,
                "variant {:?}",
                variant
            );
        }
    }

    /// Punctuation around a label does not change which rule matches
    #[test]
    fn test_punctuated_labels() {
        let five = ClassScheme::Five;
        assert_eq!(classify(Some("Medio-alto:"), five), HealthClass::MediumHigh);
        assert_eq!(classify(Some("(Medio alto)"), five), HealthClass::MediumHigh);
        assert_eq!(classify(Some("(Alto)"), five), HealthClass::High);
        assert_eq!(classify(Some("Alto."), five), HealthClass::High);
        assert_eq!(classify(Some("Alto(>0.6)"), five), HealthClass::High);
        assert_eq!(classify(Some("Bajo/Low"), five), HealthClass::Low);
        assert_eq!(normalize_label("Medio-alto:"), " medio alto ");
    }

    #[test]
    fn test_simple_and_compound_precedence() {
        let five = ClassScheme::Five;
        assert_eq!(classify(Some("Muy bajo"), five), HealthClass::VeryLow);
        assert_eq!(classify(Some("Very Low"), five), HealthClass::VeryLow);
        assert_eq!(classify(Some("Bajo"), five), HealthClass::Low);
        assert_eq!(classify(Some("Medio"), five), HealthClass::Medium);
        assert_eq!(classify(Some("Alto"), five), HealthClass::High);
        assert_eq!(classify(Some("Clase alta"), five), HealthClass::High);

        let seven = ClassScheme::Seven;
        assert_eq!(classify(Some("Medio-bajo"), seven), HealthClass::MediumLow);
        assert_eq!(classify(Some("Muy alto"), seven), HealthClass::VeryHigh);
        assert_eq!(classify(Some("Medium Low"), seven), HealthClass::MediumLow);
    }

    /// Labels outside the active scheme are not canonical
    #[test]
    fn test_labels_outside_scheme_are_no_data() {
        assert_eq!(classify(Some("Very High"), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some("Medio-bajo"), ClassScheme::Five), HealthClass::NoData);
    }

    #[test]
    fn test_missing_and_unparseable() {
        assert_eq!(classify(None, ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some(""), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some("   "), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some("sin dato"), ClassScheme::Five), HealthClass::NoData);
        assert_eq!(classify(Some("lowland"), ClassScheme::Five), HealthClass::NoData);
    }

    #[test]
    fn test_rules_apply_independently() {
        let normalized = normalize_label("Medio-Alto");
        assert_eq!(normalized, " medio alto ");

        let compound = Rule::CompoundText {
            phrases: &["medio alto"],
            class: HealthClass::MediumHigh,
        };
        assert_eq!(
            compound.apply("Medio-Alto", &normalized, ClassScheme::Five),
            Some(HealthClass::MediumHigh)
        );
        assert_eq!(Rule::NumericCode.apply("Medio-Alto", &normalized, ClassScheme::Five), None);
        assert_eq!(
            Rule::Fallback.apply("anything", " anything ", ClassScheme::Five),
            Some(HealthClass::NoData)
        );
    }

    #[test]
    fn test_breakpoints_bucket_values() {
        let classifier = Classifier::new(ClassScheme::Five)
            .with_breakpoints(
                "ndvi",
                Breakpoints {
                    thresholds: vec![0.3, 0.45, 0.6, 0.75],
                },
            )
            .unwrap();

        assert_eq!(classifier.classify_value("ndvi", Some(0.1)), HealthClass::VeryLow);
        assert_eq!(classifier.classify_value("ndvi", Some(0.3)), HealthClass::Low);
        assert_eq!(classifier.classify_value("ndvi", Some(0.59)), HealthClass::Medium);
        assert_eq!(classifier.classify_value("ndvi", Some(0.7)), HealthClass::MediumHigh);
        assert_eq!(classifier.classify_value("ndvi", Some(0.9)), HealthClass::High);
        assert_eq!(classifier.classify_value("ndvi", None), HealthClass::NoData);
        assert_eq!(classifier.classify_value("lci", Some(0.9)), HealthClass::NoData);
    }

    #[test]
    fn test_breakpoint_lookup_ignores_case() {
        let classifier = Classifier::new(ClassScheme::Five)
            .with_breakpoints(
                "NDVI",
                Breakpoints {
                    thresholds: vec![0.3, 0.45, 0.6, 0.75],
                },
            )
            .unwrap();

        assert!(classifier.has_breakpoints("ndvi"));
        assert!(classifier.has_breakpoints("NDVI"));
        assert_eq!(classifier.classify_value("NDVI", Some(0.9)), HealthClass::High);
        assert_eq!(classifier.classify_value("Ndvi", Some(0.1)), HealthClass::VeryLow);
    }

    #[test]
    fn test_precomputed_class_wins_over_value() {
        let classifier = Classifier::new(ClassScheme::Five)
            .with_breakpoints(
                "ndvi",
                Breakpoints {
                    thresholds: vec![0.3, 0.45, 0.6, 0.75],
                },
            )
            .unwrap();

        let class = classifier.classify_point("ndvi", Some(Some("Bajo")), Some(0.9));
        assert_eq!(class, HealthClass::Low);
        let class = classifier.classify_point("ndvi", Some(None), Some(0.9));
        assert_eq!(class, HealthClass::NoData);
        let class = classifier.classify_point("ndvi", None, Some(0.9));
        assert_eq!(class, HealthClass::High);
    }

    #[test]
    fn test_invalid_breakpoints_rejected() {
        let err = Classifier::new(ClassScheme::Seven)
            .with_breakpoints(
                "ndvi",
                Breakpoints {
                    thresholds: vec![0.1, 0.2],
                },
            )
            .unwrap_err();
        assert!(matches!(err, BreakpointError::WrongCount { expected: 6, actual: 2, .. }));

        let err = Classifier::new(ClassScheme::Five)
            .with_breakpoints(
                "ndvi",
                Breakpoints {
                    thresholds: vec![0.3, 0.2, 0.6, 0.75],
                },
            )
            .unwrap_err();
        assert_eq!(err, BreakpointError::NotAscending("ndvi".to_string()));
    }
}
