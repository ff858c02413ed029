//! Responsible-party usernames
//!
//! History tables show the actor of every event as a username. Raw actor labels
//! range from real usernames (`trim_crew_2`) to role placeholders
//! (`Licensing Officer`), so labels are folded into one username shape and the
//! role placeholders get a discriminator so unrelated events do not all appear
//! to come from the same account.

use once_cell::sync::Lazy;
use regex::Regex;

/// Role markers that identify placeholder rather than personal usernames
pub const GENERIC_ROLE_MARKERS: [&str; 4] = ["applicant", "licensing", "finance", "operator"];

/// Discriminator used when no identifier or time key is available
pub const FALLBACK_DISCRIMINATOR: &str = "0000";

const DISCRIMINATOR_LEN: usize = 4;

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("static regex compiles"));
static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex compiles"));

/// Fold an actor label into username shape
///
/// A label that already contains a digit or underscore is taken to be a
/// username and returned unchanged. Otherwise it is lowercased, parenthesised
/// groups are removed, runs of other characters become a single `_`, and
/// leading/trailing `_` are trimmed. An empty result becomes `user`.
///
/// Idempotent: `normalize_username(&normalize_username(x)) == normalize_username(x)`.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    if looks_like_username(raw) {
        return raw.to_string();
    }

    let lowered = raw.to_lowercase();
    let without_notes = PARENTHESIZED.replace_all(&lowered, " ");
    let collapsed = NON_ALNUM_RUN.replace_all(&without_notes, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        "user".to_string()
    } else {
        trimmed.to_string()
    }
}

fn looks_like_username(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_digit() || c == '_')
}

/// Sources for the discriminator appended to generic role usernames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscriminatorSource<'a> {
    /// Licence identifier of the event
    pub licence_id: Option<&'a str>,
    /// Batch identifier of the event
    pub batch_id: Option<&'a str>,
    /// Event time key in epoch milliseconds
    pub time_key: Option<i64>,
}

impl DiscriminatorSource<'_> {
    /// Four-character discriminator, by priority
    ///
    /// Last 4 alphanumerics of the licence id, else of the batch id, else the
    /// last 4 digits of the time key, else [`FALLBACK_DISCRIMINATOR`]. Ids with
    /// fewer than 4 alphanumerics contribute what they have.
    #[must_use]
    pub fn discriminator(&self) -> String {
        self.licence_id
            .and_then(tail_alphanumerics)
            .or_else(|| self.batch_id.and_then(tail_alphanumerics))
            .or_else(|| {
                self.time_key
                    .map(|key| format!("{:04}", key.rem_euclid(10_000)))
            })
            .unwrap_or_else(|| FALLBACK_DISCRIMINATOR.to_string())
    }
}

fn tail_alphanumerics(id: &str) -> Option<String> {
    let alnum: Vec<char> = id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if alnum.is_empty() {
        return None;
    }
    let start = alnum.len().saturating_sub(DISCRIMINATOR_LEN);
    Some(alnum[start..].iter().collect())
}

/// Whether a normalized username is a role placeholder
#[must_use]
pub fn is_generic_role(username: &str) -> bool {
    GENERIC_ROLE_MARKERS
        .iter()
        .any(|marker| username.contains(marker))
}

/// Resolve an actor label to the username shown in history tables
///
/// Normalizes the label, then appends `_{discriminator}` when the result is a
/// generic role placeholder. Distinct events may still collide; that is
/// accepted.
#[must_use]
pub fn resolve_username(raw: &str, source: &DiscriminatorSource<'_>) -> String {
    let base = normalize_username(raw);
    if is_generic_role(&base) && !looks_like_username(raw) {
        format!("{base}_{}", source.discriminator())
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn folds_display_labels() {
        assert_eq!(normalize_username("Dana Reyes"), "dana_reyes");
        assert_eq!(normalize_username("Acme Labs (Lab)"), "acme_labs");
        assert_eq!(normalize_username("  --O'Brien--  "), "o_brien");
        assert_eq!(normalize_username("Operator User"), "operator_user");
    }

    #[test]
    fn raw_usernames_pass_through() {
        assert_eq!(normalize_username("Trim_Crew"), "Trim_Crew");
        assert_eq!(normalize_username("Grower 2"), "Grower 2");
    }

    #[test]
    fn empty_becomes_user() {
        assert_eq!(normalize_username(""), "user");
        assert_eq!(normalize_username("(Supplier)"), "user");
        assert_eq!(normalize_username("!!!"), "user");
    }

    #[test]
    fn non_ascii_letters_collapse() {
        assert_eq!(normalize_username("José Núñez"), "jos_n_ez");
    }

    #[test]
    fn discriminator_priority() {
        let full = DiscriminatorSource {
            licence_id: Some("LIC-2024-00A7"),
            batch_id: Some("B-9999"),
            time_key: Some(1_735_689_600_000),
        };
        assert_eq!(full.discriminator(), "00a7");

        let batch_only = DiscriminatorSource {
            batch_id: Some("batch-0042"),
            time_key: Some(1_735_689_600_000),
            ..DiscriminatorSource::default()
        };
        assert_eq!(batch_only.discriminator(), "0042");

        let time_only = DiscriminatorSource {
            time_key: Some(1_735_689_601_234),
            ..DiscriminatorSource::default()
        };
        assert_eq!(time_only.discriminator(), "1234");

        let short_time = DiscriminatorSource {
            time_key: Some(7),
            ..DiscriminatorSource::default()
        };
        assert_eq!(short_time.discriminator(), "0007");

        assert_eq!(DiscriminatorSource::default().discriminator(), "0000");
    }

    #[test]
    fn punctuation_only_ids_fall_through() {
        let source = DiscriminatorSource {
            licence_id: Some("--"),
            batch_id: Some("AB"),
            ..DiscriminatorSource::default()
        };
        assert_eq!(source.discriminator(), "ab");
    }

    #[test]
    fn generic_roles_get_discriminated() {
        let source = DiscriminatorSource {
            licence_id: Some("LIC-7781"),
            ..DiscriminatorSource::default()
        };
        assert_eq!(
            resolve_username("Licensing Officer", &source),
            "licensing_officer_7781"
        );
        assert_eq!(
            resolve_username("Applicant User", &DiscriminatorSource::default()),
            "applicant_user_0000"
        );
        assert_eq!(resolve_username("Dana Reyes", &source), "dana_reyes");
    }

    #[test]
    fn raw_usernames_are_not_discriminated() {
        let source = DiscriminatorSource {
            licence_id: Some("LIC-7781"),
            ..DiscriminatorSource::default()
        };
        assert_eq!(resolve_username("operator_7", &source), "operator_7");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in ".{0,40}") {
            let once = normalize_username(&raw);
            prop_assert_eq!(normalize_username(&once), once);
        }

        #[test]
        fn prop_resolved_username_is_stable(raw in "[A-Za-z ()'-]{0,30}", key in proptest::option::of(any::<i64>())) {
            let source = DiscriminatorSource { time_key: key, ..DiscriminatorSource::default() };
            let resolved = resolve_username(&raw, &source);
            prop_assert_eq!(resolve_username(&resolved, &source), resolved);
        }
    }
}
