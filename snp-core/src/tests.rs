mod enums {
    use crate::enums::*;
    use std::f64::consts::PI;

    #[test]
    fn frequency_unit_from_token() {
        assert_eq!(FrequencyUnit::from_token("HZ"), Some(FrequencyUnit::Hz));
        assert_eq!(FrequencyUnit::from_token("KHZ"), Some(FrequencyUnit::KiloHz));
        assert_eq!(FrequencyUnit::from_token("MHZ"), Some(FrequencyUnit::MegaHz));
        assert_eq!(FrequencyUnit::from_token("GHZ"), Some(FrequencyUnit::GigaHz));
        assert_eq!(FrequencyUnit::from_token("THZ"), None);
        assert_eq!(FrequencyUnit::from_token("mhz"), None);
    }

    #[test]
    fn frequency_unit_multiplier() {
        assert_eq!(FrequencyUnit::Hz.multiplier(), 1.0);
        assert_eq!(FrequencyUnit::KiloHz.multiplier(), 1e3);
        assert_eq!(FrequencyUnit::MegaHz.multiplier(), 1e6);
        assert_eq!(FrequencyUnit::GigaHz.multiplier(), 1e9);
        assert_eq!(FrequencyUnit::default(), FrequencyUnit::GigaHz);
    }

    #[test]
    fn number_format_from_token() {
        assert_eq!(NumberFormat::from_token("DB"), Some(NumberFormat::DbAngle));
        assert_eq!(
            NumberFormat::from_token("MA"),
            Some(NumberFormat::MagnitudeAngle)
        );
        assert_eq!(
            NumberFormat::from_token("RI"),
            Some(NumberFormat::RealImaginary)
        );
        assert_eq!(NumberFormat::from_token("XX"), None);
        assert_eq!(NumberFormat::default(), NumberFormat::MagnitudeAngle);
    }

    #[test]
    fn normalize_pair_magnitude_angle() {
        let mut pair = [0.25, -45.0];
        NumberFormat::MagnitudeAngle.normalize_pair(&mut pair);
        assert_eq!(pair[0], 0.25);
        assert!((pair[1] + PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_pair_db_angle() {
        let mut pair = [-20.0, 90.0];
        NumberFormat::DbAngle.normalize_pair(&mut pair);
        assert!((pair[0] - 0.1).abs() < 1e-12);
        assert!((pair[1] - PI / 2.0).abs() < 1e-12);

        let mut unity = [0.0, 0.0];
        NumberFormat::DbAngle.normalize_pair(&mut unity);
        assert_eq!(unity[0], 1.0);
        assert_eq!(unity[1], 0.0);
    }

    #[test]
    fn normalize_pair_real_imaginary() {
        let mut pair = [3.0, 4.0];
        NumberFormat::RealImaginary.normalize_pair(&mut pair);
        assert!((pair[0] - 5.0).abs() < 1e-12);
        assert!((pair[1] - (4f64).atan2(3.0)).abs() < 1e-12);

        // The origin has no angle; it is reported as zero.
        let mut zero = [0.0, 0.0];
        NumberFormat::RealImaginary.normalize_pair(&mut zero);
        assert_eq!(zero[0], 0.0);
        assert_eq!(zero[1], 0.0);
    }

    #[test]
    fn parameter_kind_from_token() {
        assert_eq!(
            ParameterKind::from_token("S"),
            Some(ParameterKind::Scattering)
        );
        assert_eq!(
            ParameterKind::from_token("Y"),
            Some(ParameterKind::Admittance)
        );
        assert_eq!(
            ParameterKind::from_token("Z"),
            Some(ParameterKind::Impedance)
        );
        assert_eq!(ParameterKind::from_token("H"), Some(ParameterKind::HybridH));
        assert_eq!(ParameterKind::from_token("G"), Some(ParameterKind::HybridG));
        assert_eq!(ParameterKind::from_token("T"), None);
    }

    #[test]
    fn two_port_order_from_token() {
        assert_eq!(
            TwoPortOrder::from_token("12_21"),
            Some(TwoPortOrder::Order12_21)
        );
        assert_eq!(
            TwoPortOrder::from_token("21_12"),
            Some(TwoPortOrder::Order21_12)
        );
        assert_eq!(TwoPortOrder::from_token("11_22"), None);
        assert_eq!(TwoPortOrder::default(), TwoPortOrder::Order21_12);
    }

    #[test]
    fn matrix_format_from_token() {
        assert_eq!(MatrixFormat::from_token("FULL"), Some(MatrixFormat::Full));
        assert_eq!(MatrixFormat::from_token("LOWER"), Some(MatrixFormat::Lower));
        assert_eq!(MatrixFormat::from_token("UPPER"), Some(MatrixFormat::Upper));
        assert_eq!(MatrixFormat::from_token("SPARSE"), None);
        assert_eq!(MatrixFormat::default(), MatrixFormat::Full);
    }
}

mod header {
    use crate::enums::*;
    use crate::header::SnpHeader;
    use crate::SnpError;

    #[test]
    fn defaults() {
        let header = SnpHeader::default();
        assert_eq!(header.file_version, 1);
        assert_eq!(header.frequency_unit, FrequencyUnit::GigaHz);
        assert_eq!(header.number_format, NumberFormat::MagnitudeAngle);
        assert_eq!(header.parameter_kind, ParameterKind::Scattering);
        assert_eq!(header.reference_resistance, 50.0);
        assert_eq!(header.num_ports, 0);
        assert_eq!(header.two_port_order, TwoPortOrder::Order21_12);
        assert_eq!(header.matrix_format, MatrixFormat::Full);
        assert!(header.reference_resistances.is_none());
    }

    #[test]
    fn option_line_tokens_in_any_order() {
        let mut a = SnpHeader::default();
        a.apply_option_line("# MHZ S RI R 75").unwrap();
        let mut b = SnpHeader::default();
        b.apply_option_line("# R 75 RI S MHZ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.frequency_unit, FrequencyUnit::MegaHz);
        assert_eq!(a.number_format, NumberFormat::RealImaginary);
        assert_eq!(a.reference_resistance, 75.0);
    }

    #[test]
    fn option_line_bare() {
        let mut header = SnpHeader::default();
        header.apply_option_line("#").unwrap();
        assert_eq!(header.frequency_unit, FrequencyUnit::GigaHz);
        assert_eq!(header.number_format, NumberFormat::MagnitudeAngle);
        assert_eq!(header.parameter_kind, ParameterKind::Scattering);
        assert_eq!(header.reference_resistance, 50.0);
    }

    #[test]
    fn option_line_unknown_tokens_skipped() {
        let mut header = SnpHeader::default();
        header.apply_option_line("# HZ FOO Z BAR DB").unwrap();
        assert_eq!(header.frequency_unit, FrequencyUnit::Hz);
        assert_eq!(header.parameter_kind, ParameterKind::Impedance);
        assert_eq!(header.number_format, NumberFormat::DbAngle);
    }

    #[test]
    fn option_line_bad_reference() {
        let mut header = SnpHeader::default();
        let err = header.apply_option_line("# HZ S MA R").unwrap_err();
        assert!(matches!(err, SnpError::BadOptionLine { .. }));

        let err = header.apply_option_line("# R FIFTY").unwrap_err();
        assert!(matches!(err, SnpError::BadOptionLine { .. }));
    }

    #[test]
    fn values_per_row() {
        let mut header = SnpHeader::default();
        assert_eq!(header.values_per_row(), None);

        header.num_ports = 2;
        assert_eq!(header.values_per_row(), Some(9));
        assert_eq!(header.matrix_values(), 8);

        header.num_ports = 3;
        assert_eq!(header.values_per_row(), Some(19));
        header.matrix_format = MatrixFormat::Upper;
        assert_eq!(header.values_per_row(), Some(13));
        header.matrix_format = MatrixFormat::Lower;
        assert_eq!(header.values_per_row(), Some(13));
        assert_eq!(header.matrix_values(), 18);
    }
}

mod frames {
    use crate::enums::ParameterKind;
    use crate::frames::MqFlags;

    #[test]
    fn flag_operations() {
        let flags = MqFlags::REFERENCE | MqFlags::PARAM_S;
        assert!(flags.contains(MqFlags::REFERENCE));
        assert!(flags.contains(MqFlags::PARAM_S));
        assert!(!flags.contains(MqFlags::PARAM_Y));
        assert!(!flags.is_empty());
        assert!(MqFlags::NONE.is_empty());
        assert!(flags.contains(MqFlags::NONE));
    }

    #[test]
    fn flags_for_kind() {
        assert_eq!(MqFlags::for_kind(ParameterKind::Scattering), MqFlags::PARAM_S);
        assert_eq!(MqFlags::for_kind(ParameterKind::Admittance), MqFlags::PARAM_Y);
        assert_eq!(MqFlags::for_kind(ParameterKind::Impedance), MqFlags::PARAM_Z);
        assert_eq!(MqFlags::for_kind(ParameterKind::HybridG), MqFlags::PARAM_G);
        assert_eq!(MqFlags::for_kind(ParameterKind::HybridH), MqFlags::PARAM_H);
    }
}

mod settings {
    use crate::settings::SnpSettings;

    #[test]
    fn defaults_and_setters() {
        let mut settings = SnpSettings::default();
        assert!(!settings.get_strict_row_width());
        assert!(settings.get_emit_nonscattering_reference());
        assert!(settings.get_convert_noise_values());

        settings.set_strict_row_width(true);
        settings.set_emit_nonscattering_reference(false);
        settings.set_convert_noise_values(false);
        assert!(settings.get_strict_row_width());
        assert!(!settings.get_emit_nonscattering_reference());
        assert!(!settings.get_convert_noise_values());
    }
}

mod errors {
    use crate::SnpError;

    #[test]
    fn display_strings() {
        let err = SnpError::InconsistentMatrixShape { count: 7 };
        assert_eq!(
            err.to_string(),
            "A row of 7 values does not describe a square matrix of any port count"
        );

        let err = SnpError::NoiseRequiresTwoPorts { ports: 3 };
        let msg: String = err.into();
        assert!(msg.contains("two-ports"));

        let err = SnpError::MissingRequiredKeyword {
            keyword: "[NUMBER OF PORTS]",
        };
        assert!(err.to_string().contains("[NUMBER OF PORTS]"));
    }
}
