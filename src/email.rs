//! Quote email content generation.
//!
//! Template substitution over already-formatted strings. No currency
//! formatting or rounding happens here; [`quote_email_vars`] prepares the
//! values upstream.

use std::collections::HashMap;
use std::fmt::Write;

use crate::domain::pricing::QuoteSummary;
use crate::domain::quote::QuoteDraft;

/// Fixed free-time/overtime sentences present in the stored templates.
/// Stripped before substitution when no haulage offer is selected.
const FREE_TIME_NOTE_FR: &str = "La franchise de chargement est incluse selon les conditions du transporteur ; toute heure supplémentaire sera facturée au tarif horaire en vigueur.";
const FREE_TIME_NOTE_EN: &str = "Free loading time is included as per the haulier's conditions; any additional hour will be invoiced at the applicable overtime rate.";

/// Replaces each `{{name}}` placeholder with its resolved value wrapped in a
/// bold tag. Placeholders whose value is missing or empty are left untouched,
/// so unresolved variables remain visibly templated instead of silently
/// blanked.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        if value.is_empty() {
            continue;
        }
        let placeholder = format!("{{{{{name}}}}}");
        let replacement = format!("<strong>{value}</strong>");
        rendered = rendered.replace(&placeholder, &replacement);
    }
    rendered
}

/// Removes the two fixed free-time/overtime sentences from a template.
pub fn strip_haulage_boilerplate(template: &str) -> String {
    template
        .replace(FREE_TIME_NOTE_FR, "")
        .replace(FREE_TIME_NOTE_EN, "")
}

/// Renders the quote email: the haulage boilerplate is stripped when no
/// haulage offer is selected, then placeholders are substituted.
pub fn render_quote_email(
    template: &str,
    vars: &HashMap<String, String>,
    haulage_selected: bool,
) -> String {
    if haulage_selected {
        render_template(template, vars)
    } else {
        render_template(&strip_haulage_boilerplate(template), vars)
    }
}

/// Builds the variable map for the quote email from a priced draft.
///
/// Values are fully formatted strings; anything unavailable is mapped to an
/// empty string so its placeholder survives substitution.
pub fn quote_email_vars(draft: &QuoteDraft, summary: &QuoteSummary) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    let first_offer = draft.seafreights().first();
    let currency = first_offer
        .map(|offer| offer.currency.as_str())
        .unwrap_or("");

    vars.insert(
        "carrier".to_string(),
        first_offer
            .map(|offer| offer.carrier_name.clone())
            .unwrap_or_default(),
    );
    vars.insert(
        "transitTime".to_string(),
        first_offer
            .and_then(|offer| offer.transit_time_days)
            .map(|days| format!("{days} days"))
            .unwrap_or_default(),
    );
    vars.insert(
        "frequency".to_string(),
        first_offer
            .and_then(|offer| offer.frequency.clone())
            .unwrap_or_default(),
    );

    if let Some(haulage) = draft.haulage() {
        vars.insert("haulier".to_string(), haulage.haulier_name.clone());
        vars.insert(
            "freeTime".to_string(),
            format!("{:.0} hours", haulage.free_time_hours),
        );
        vars.insert(
            "overtimeTariff".to_string(),
            format!("{:.2} {}", haulage.overtime_tariff, haulage.currency),
        );
    } else {
        vars.insert("haulier".to_string(), String::new());
        vars.insert("freeTime".to_string(), String::new());
        vars.insert("overtimeTariff".to_string(), String::new());
    }

    let mut container_lines = String::new();
    for priced in &summary.containers {
        let _ = writeln!(
            container_lines,
            "{} x {}: {:.2} {}",
            priced.quantity, priced.container, priced.sale_price, currency
        );
    }
    vars.insert("containers".to_string(), container_lines.trim_end().to_string());
    vars.insert(
        "totalPrice".to_string(),
        if summary.containers.is_empty() {
            String::new()
        } else {
            format!("{:.2} {}", summary.total_sale, currency)
        },
    );

    vars
}
