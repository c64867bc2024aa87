//! Interactive co-term license claiming workflow
//!
//! Resolves an organization by name, verifies it is co-term licensed,
//! collects license keys, claims them one at a time in the chosen mode,
//! then prints a before/after summary of Systems Manager seats and the
//! shared expiration date.

use crate::cmd::progress;
use crate::dashboard::organizations::{
    self, ClaimMode, LicenseClaim, LicenseOverview, Organization, SM_DEVICE_TYPE,
};
use crate::dashboard::DashboardClient;
use crate::error::{CotermError, Result};
use crate::prompts;
use colored::Colorize;

/// Markers in claim error messages that identify the two known failures.
const NOT_FOUND_MARKER: &str = "not found";
const ALREADY_CLAIMED_MARKER: &str = "has already been claimed.";

/// Where each submitted key ended up. The four lists partition the
/// submitted set: every key lands in exactly one of them.
#[derive(Debug, Default)]
pub struct ClaimReport {
    pub added: Vec<String>,
    pub not_found: Vec<String>,
    pub already_claimed: Vec<String>,
    /// Keys whose failure message matched neither known marker, with the
    /// message retained. Never folded into `added`.
    pub failed: Vec<(String, String)>,
}

enum ClaimOutcome {
    Added,
    NotFound,
    AlreadyClaimed,
    Failed(String),
}

/// Run the full interactive workflow against the Dashboard API.
pub async fn claim_interactive(api_key: String) -> Result<()> {
    let client = DashboardClient::new(api_key);

    let spinner = progress::create_spinner("Fetching organizations visible to this key...");
    let orgs = match organizations::list_organizations(&client).await {
        Ok(orgs) => {
            progress::finish_spinner_success(
                &spinner,
                &format!("{} organization(s) visible", orgs.len()),
            );
            orgs
        }
        Err(e) => {
            progress::finish_spinner_error(&spinner, "Could not list organizations");
            return Err(e);
        }
    };
    tracing::debug!(?orgs, "fetched organizations");

    println!(
        "Enter the name of the organization to add licenses to. It is shown in the"
    );
    println!(
        "dashboard under {}.",
        "Organization > Settings > Name".bold()
    );
    let org_name = prompts::input("Organization name, verbatim")?;

    let org = resolve_organization(&orgs, &org_name)
        .ok_or_else(|| CotermError::OrganizationNotFound(org_name.clone()))?
        .clone();
    tracing::debug!(org_id = %org.id, "resolved organization");
    prompts::success(&format!("Found organization '{}' (id {})", org.name, org.id));

    ensure_coterm(&client, &org).await?;

    let keys = collect_license_keys()?;
    tracing::debug!(?keys, "license keys to claim");

    let before = organizations::get_license_overview(&client, &org.id).await?;

    println!(
        "{} adds capacity for new devices on top of an existing deployment.",
        "ADD".bold()
    );
    println!(
        "{} extends the term of the licenses you already have.",
        "RENEW".bold()
    );
    let mode_input = prompts::input_allow_empty("Type ADD or RENEW")?;
    let mode = ClaimMode::from_input(&mode_input);

    prompts::info(&format!(
        "Claiming {} license(s) into '{}' in {} mode",
        keys.len(),
        org.name,
        mode
    ));
    let report = submit_claims(&client, &org.id, &keys, mode).await;

    let after = match organizations::get_license_overview(&client, &org.id).await {
        Ok(overview) => overview,
        Err(e) => {
            prompts::warning(&format!(
                "Could not re-fetch the license overview: {}. Showing pre-claim values.",
                e
            ));
            before.clone()
        }
    };

    print_summary(&before, &after, &report);

    Ok(())
}

/// Licensing-mode gate. The per-device listing only succeeds for PDL
/// organizations, so success means the claim API is unusable and the
/// workflow must stop; any rejection means the organization is co-term.
pub async fn ensure_coterm(client: &DashboardClient, org: &Organization) -> Result<()> {
    match organizations::get_licenses(client, &org.id).await {
        Ok(_) => Err(CotermError::PerDeviceLicensing(org.name.clone())),
        Err(e) => {
            tracing::debug!(error = %e, "per-device probe rejected; organization is co-term");
            Ok(())
        }
    }
}

/// First organization whose name equals `name` exactly. Case-sensitive,
/// whole-string comparison; substrings never match.
fn resolve_organization<'a>(orgs: &'a [Organization], name: &str) -> Option<&'a Organization> {
    orgs.iter().find(|org| org.name == name)
}

/// Split one line of operator input into candidate keys.
fn parse_license_keys(line: &str) -> Vec<String> {
    line.split(',')
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Keys are dash-separated blocks of ASCII alphanumerics.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Prompt for a comma-separated key list until every token is acceptable.
fn collect_license_keys() -> Result<Vec<String>> {
    println!("Enter the license keys, separated by commas.");
    println!("E.g. {}", "Z2AA-BBBB-CCCC,Z2AA-BBBB-CCCD".dimmed());

    loop {
        let line = prompts::input("License keys")?;
        let keys = parse_license_keys(&line);

        if keys.is_empty() {
            prompts::warning("No keys entered");
            continue;
        }

        let invalid: Vec<&str> = keys
            .iter()
            .filter(|key| !is_valid_key(key))
            .map(|key| key.as_str())
            .collect();

        if invalid.is_empty() {
            return Ok(keys);
        }

        prompts::warning(&format!(
            "These keys contain characters outside A-Z, 0-9 and '-': {}",
            invalid.join(", ")
        ));
    }
}

fn classify_claim_error(message: &str) -> ClaimOutcome {
    if message.contains(NOT_FOUND_MARKER) {
        ClaimOutcome::NotFound
    } else if message.contains(ALREADY_CLAIMED_MARKER) {
        ClaimOutcome::AlreadyClaimed
    } else {
        ClaimOutcome::Failed(message.to_string())
    }
}

/// Submit one claim per key, sequentially and in operator order, and
/// classify each outcome.
pub async fn submit_claims(
    client: &DashboardClient,
    org_id: &str,
    keys: &[String],
    mode: ClaimMode,
) -> ClaimReport {
    let mut report = ClaimReport::default();
    let bar = progress::create_progress_bar(keys.len() as u64, "Claiming licenses");

    for key in keys {
        let claim = [LicenseClaim {
            key: key.clone(),
            mode,
        }];
        tracing::debug!(key = %key, mode = %mode, "submitting claim");

        let outcome = match organizations::claim_licenses(client, org_id, &claim).await {
            Ok(_) => ClaimOutcome::Added,
            Err(CotermError::Api { message, .. }) => classify_claim_error(&message),
            Err(e) => ClaimOutcome::Failed(e.to_string()),
        };

        match outcome {
            ClaimOutcome::Added => report.added.push(key.clone()),
            ClaimOutcome::NotFound => report.not_found.push(key.clone()),
            ClaimOutcome::AlreadyClaimed => report.already_claimed.push(key.clone()),
            ClaimOutcome::Failed(message) => report.failed.push((key.clone(), message)),
        }

        bar.inc(1);
    }

    progress::finish_progress_success(&bar, "All claims submitted");
    report
}

fn print_summary(before: &LicenseOverview, after: &LicenseOverview, report: &ClaimReport) {
    prompts::section_header("Summary");

    println!(
        "  Old license count for {}:   {}",
        SM_DEVICE_TYPE,
        before.seat_count(SM_DEVICE_TYPE)
    );
    println!(
        "  Old co-term expiration date: {}",
        before.expiration_label()
    );
    println!();
    println!(
        "  New license count for {}:   {}",
        SM_DEVICE_TYPE,
        after.seat_count(SM_DEVICE_TYPE)
    );
    println!(
        "  New co-term expiration date: {}",
        after.expiration_label()
    );

    print_key_list("Licenses added", &report.added);
    print_key_list("Licenses not found", &report.not_found);
    print_key_list("Licenses already claimed", &report.already_claimed);

    println!("\n{}", "Licenses with unrecognized failures:".bold());
    if report.failed.is_empty() {
        println!("  (none)");
    } else {
        for (key, message) in &report.failed {
            println!("  {} {}", key, format!("({})", message).dimmed());
        }
    }
}

fn print_key_list(title: &str, keys: &[String]) {
    println!("\n{}:", title.bold());
    if keys.is_empty() {
        println!("  (none)");
    } else {
        for key in keys {
            println!("  {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str, name: &str) -> Organization {
        Organization {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn resolves_exact_name_match() {
        let orgs = [org("1", "Acme"), org("2", "Globex")];
        let resolved = resolve_organization(&orgs, "Acme").unwrap();
        assert_eq!(resolved.id, "1");
    }

    #[test]
    fn resolution_is_case_sensitive() {
        let orgs = [org("1", "Acme")];
        assert!(resolve_organization(&orgs, "acme").is_none());
    }

    #[test]
    fn resolution_rejects_partial_matches() {
        let orgs = [org("1", "Acme Corp")];
        assert!(resolve_organization(&orgs, "Acme").is_none());
        assert!(resolve_organization(&orgs, "Acme Corp ").is_none());
    }

    #[test]
    fn key_parsing_trims_and_drops_empty_tokens() {
        assert_eq!(
            parse_license_keys(" Z2AA-BBBB-CCCC , Z2AA-BBBB-CCCD ,,"),
            vec!["Z2AA-BBBB-CCCC", "Z2AA-BBBB-CCCD"]
        );
        assert!(parse_license_keys("").is_empty());
        assert!(parse_license_keys(" , ,").is_empty());
    }

    #[test]
    fn key_validation_allows_dashed_alphanumerics() {
        assert!(is_valid_key("Z2AA-BBBB-CCCC"));
        assert!(is_valid_key("Z123"));
        assert!(!is_valid_key("Z2AA BBBB"));
        assert!(!is_valid_key("Z2AA_BBBB"));
        assert!(!is_valid_key(""));
    }

    #[test]
    fn known_failure_messages_classify_into_their_buckets() {
        assert!(matches!(
            classify_claim_error("License with key Q2XX-XXXX-XXXX not found"),
            ClaimOutcome::NotFound
        ));
        assert!(matches!(
            classify_claim_error("License with key Q2XX-XXXX-XXXX has already been claimed."),
            ClaimOutcome::AlreadyClaimed
        ));
    }

    #[test]
    fn unrecognized_failures_never_count_as_added() {
        let outcome = classify_claim_error("License key is invalid for this region");
        match outcome {
            ClaimOutcome::Failed(message) => {
                assert_eq!(message, "License key is invalid for this region")
            }
            _ => panic!("expected the unknown-failure bucket"),
        }
    }
}
