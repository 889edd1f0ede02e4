use lucky_wheel::config::MAX_ENTRIES;

/// Weights are shown with one decimal, matching how equal splits are stored.
pub fn format_weight(weight: f64) -> String {
    format!("{:.1}", weight)
}

/// Status line under the table, e.g. `Total: 99.9% (3/100 entries)`.
pub fn format_total(total: f64, count: usize) -> String {
    format!("Total: {:.1}% ({}/{} entries)", total, count, MAX_ENTRIES)
}

/// Blocking browser confirmation; treated as "no" if the dialog cannot be shown.
pub fn confirm(message: &str) -> bool {
    gloo_utils::window()
        .confirm_with_message(message)
        .unwrap_or(false)
}
