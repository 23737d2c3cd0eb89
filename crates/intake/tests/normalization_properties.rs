use chrono::{DateTime, TimeZone, Utc};
use intake::{normalize, CanonicalField, CanonicalLead, IntakeConfig, Provenance, RawSubmission};

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap()
}

fn provenance() -> Provenance {
    Provenance {
        form_type: "contact".into(),
        source: "Website Form".into(),
        submitted_at: fixed_timestamp(),
        page_url: "https://example.com/contact.html".into(),
        user_agent: "property-test".into(),
    }
}

fn base_values() -> Vec<(CanonicalField, &'static str)> {
    vec![
        (CanonicalField::FirstName, "Ada"),
        (CanonicalField::LastName, "Lovelace"),
        (CanonicalField::Name, "Ada Lovelace"),
        (CanonicalField::Email, "ada@example.com"),
        (CanonicalField::Phone, "(555) 123-4567"),
        (CanonicalField::Address, "12 Analytical Engine Way"),
        (CanonicalField::Beds, "4"),
        (CanonicalField::Baths, "2"),
        (CanonicalField::Condition, "Fair"),
        (CanonicalField::Timeframe, "1-3 months"),
        (CanonicalField::PropertyType, "Townhouse"),
        (CanonicalField::Message, "Call after 5pm"),
    ]
}

fn lead_with(spelling: impl Fn(CanonicalField) -> String) -> CanonicalLead {
    let raw: RawSubmission = base_values()
        .into_iter()
        .map(|(field, value)| (spelling(field), value))
        .collect();
    normalize(&raw, provenance(), &IntakeConfig::default())
}

#[test]
fn any_single_alias_matches_canonical_spelling() {
    let cfg = IntakeConfig::default();
    let canonical = lead_with(|field| field.as_str().to_string());

    for entry in cfg.aliases.iter() {
        let aliased = lead_with(|field| {
            if field == entry.field {
                entry.alias.clone()
            } else {
                field.as_str().to_string()
            }
        });
        assert_eq!(aliased, canonical, "alias '{}' diverged", entry.alias);
    }
}

#[test]
fn every_field_aliased_at_once_matches_canonical_spelling() {
    let cfg = IntakeConfig::default();
    let canonical = lead_with(|field| field.as_str().to_string());

    let all_aliased = lead_with(|field| {
        cfg.aliases
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.alias.clone())
            .unwrap_or_else(|| field.as_str().to_string())
    });
    assert_eq!(all_aliased, canonical);
}

#[test]
fn name_derivation_is_total() {
    let samples = ["", "   ", "Ada", "Ada Lovelace", "  Mary   Ann van Dyke "];
    let name_spellings = ["name", "full_name"];
    let first_spellings = ["firstName", "first-name"];
    let last_spellings = ["lastName", "last_name"];

    for name in samples {
        for first in samples {
            for last in samples {
                let any_present = [name, first, last].iter().any(|v| !v.trim().is_empty());
                if !any_present {
                    continue;
                }
                for (idx, name_key) in name_spellings.iter().enumerate() {
                    let raw: RawSubmission = [
                        (*name_key, name),
                        (first_spellings[idx], first),
                        (last_spellings[idx], last),
                    ]
                    .into_iter()
                    .collect();
                    let lead = normalize(&raw, provenance(), &IntakeConfig::default());

                    assert!(
                        !lead.name.trim().is_empty(),
                        "name blank for ({name:?}, {first:?}, {last:?})"
                    );
                    assert!(
                        !lead.first_name.trim().is_empty() || !lead.last_name.trim().is_empty(),
                        "first/last blank for ({name:?}, {first:?}, {last:?})"
                    );
                }
            }
        }
    }
}

#[test]
fn lead_without_any_name_stays_nameless() {
    let raw: RawSubmission = [("phone", "(555) 000-1111")].into_iter().collect();
    let lead = normalize(&raw, provenance(), &IntakeConfig::default());
    assert_eq!(lead.name, "");
    assert_eq!(lead.first_name, "");
    assert_eq!(lead.last_name, "");
}
