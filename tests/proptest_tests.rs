//! Property-based tests for the checksum library and tolerance handling.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use chrono::DateTime;
use nota::checksum::*;
use nota::core::*;
use nota::rules::Validator;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn with_digits(body: &str, digits: &[u32]) -> String {
    let mut id = body.to_string();
    for d in digits {
        id.push(char::from_digit(*d, 10).unwrap());
    }
    id
}

/// Replace the final digit with a different one.
fn bump_last(id: &str, by: u32) -> String {
    let (head, last) = id.split_at(id.len() - 1);
    let d = last.parse::<u32>().unwrap();
    format!("{head}{}", (d + by) % 10)
}

fn repeated(id: &str) -> bool {
    id.bytes().all(|b| b == id.as_bytes()[0])
}

fn invoice_with_line_total(line_total: Decimal) -> Document {
    DocumentBuilder::new(
        DocumentType::ConsumerInvoice,
        "35240511222333000181650010000004561123456785",
        DateTime::parse_from_rfc3339("2024-05-10T18:45:00-03:00").unwrap(),
    )
    .issuer(IssuerBuilder::new("11222333000181", "ACME Comercio Ltda", "SP").build())
    .tax_regime(TaxRegime::SimplesNacional)
    .add_item(
        LineItemBuilder::new(1, "P-002", "Caneta", Decimal::from(3), "UN", Decimal::new(250, 2))
            .line_total(line_total)
            .build(),
    )
    .build()
    .unwrap()
}

proptest! {
    #[test]
    fn computed_cnpj_digits_validate(body in "[0-9]{12}", by in 1u32..10) {
        let digits = check_digits(&body).unwrap();
        let cnpj = with_digits(&body, &digits);
        prop_assume!(!repeated(&cnpj));

        prop_assert!(is_valid_cnpj(&cnpj));
        prop_assert!(is_valid_national_id(&cnpj));
        prop_assert!(!is_valid_cnpj(&bump_last(&cnpj, by)));
    }

    #[test]
    fn computed_cpf_digits_validate(body in "[0-9]{9}", by in 1u32..10) {
        let digits = check_digits(&body).unwrap();
        let cpf = with_digits(&body, &digits);
        prop_assume!(!repeated(&cpf));

        prop_assert!(is_valid_cpf(&cpf));
        prop_assert!(!is_valid_cpf(&bump_last(&cpf, by)));
    }

    #[test]
    fn computed_access_key_validates(prefix in "[0-9]{43}", by in 1u32..10) {
        let digit = access_key_check_digit(&prefix).unwrap();
        prop_assert!(digit <= 9);
        let key = with_digits(&prefix, &[digit]);

        prop_assert!(is_valid_access_key(&key));
        prop_assert!(AccessKey::parse(&key).is_some());
        prop_assert!(!is_valid_access_key(&bump_last(&key, by)));
    }

    #[test]
    fn short_or_non_numeric_keys_rejected(key in "[0-9A-Z]{0,50}") {
        prop_assume!(key.len() != 44 || key.bytes().any(|b| !b.is_ascii_digit()));
        prop_assert!(!is_valid_access_key(&key));
    }

    #[test]
    fn unknown_jurisdiction_accepts_anything(uf in "[A-Z]{2}", id in "[0-9A-Z]{0,20}") {
        prop_assume!(scheme_for(&uf).is_none());
        prop_assert!(is_valid_registration(&uf, &id));
    }

    #[test]
    fn exemption_accepted_everywhere(index in 0usize..27) {
        let uf = schemes()[index].jurisdiction;
        prop_assert!(is_valid_registration(uf, EXEMPT));
        prop_assert!(is_valid_registration(uf, "isento"));
    }

    /// Line totals within one cent of quantity times price pass; anything
    /// further fails.
    #[test]
    fn line_arithmetic_tolerance(thousandths in -300i64..300) {
        let delta = Decimal::new(thousandths, 3);
        let doc = invoice_with_line_total(Decimal::new(750, 2) + delta);
        let failed = Validator::default()
            .validate(&doc)
            .iter()
            .any(|i| i.code == "ARI-01");
        prop_assert_eq!(failed, delta.abs() > Decimal::new(1, 2));
    }
}

#[test]
fn registration_table_covers_every_uf() {
    for uf in nota::core::jurisdictions::all() {
        assert!(scheme_for(uf).is_some(), "{uf} has no registration scheme");
    }
    assert_eq!(schemes().len(), 27);
}
