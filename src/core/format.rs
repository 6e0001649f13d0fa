const RUPEE: &str = "₹";
const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

/// Whole-rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(value: f64) -> String {
    if value.is_nan() {
        return format!("{RUPEE}NaN");
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{RUPEE}∞");
    }

    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{RUPEE}{}", group_indian(&digits))
}

/// Compact label for chart axes: `₹1.25Cr`, `₹3.40L`, `₹12.5k`, `₹900`.
pub fn format_inr_short(value: f64) -> String {
    let abs = value.abs();
    if abs >= CRORE {
        format!("{RUPEE}{:.2}Cr", value / CRORE)
    } else if abs >= LAKH {
        format!("{RUPEE}{:.2}L", value / LAKH)
    } else if abs >= 1_000.0 {
        format!("{RUPEE}{:.1}k", value / 1_000.0)
    } else {
        format!("{RUPEE}{:.0}", value)
    }
}

// Last three digits form one group, everything before is grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_lakhs_and_crores() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(1_000.0), "₹1,000");
        assert_eq!(format_inr(50_000.0), "₹50,000");
        assert_eq!(format_inr(100_000.0), "₹1,00,000");
        assert_eq!(format_inr(1_234_567.0), "₹12,34,567");
        assert_eq!(format_inr(123_456_789.0), "₹12,34,56,789");
    }

    #[test]
    fn rounds_to_whole_rupees() {
        assert_eq!(format_inr(1_714_285.714), "₹17,14,286");
        assert_eq!(format_inr(2.5), "₹3");
        assert_eq!(format_inr(0.4), "₹0");
        assert_eq!(format_inr(-0.4), "₹0");
    }

    #[test]
    fn negative_amounts_lead_with_minus() {
        assert_eq!(format_inr(-5_000.0), "-₹5,000");
        assert_eq!(format_inr(-123_456.0), "-₹1,23,456");
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        assert_eq!(format_inr(f64::NAN), "₹NaN");
        assert_eq!(format_inr(f64::INFINITY), "₹∞");
        assert_eq!(format_inr(f64::NEG_INFINITY), "-₹∞");
    }

    #[test]
    fn short_labels_pick_unit_by_magnitude() {
        assert_eq!(format_inr_short(25_000_000.0), "₹2.50Cr");
        assert_eq!(format_inr_short(345_000.0), "₹3.45L");
        assert_eq!(format_inr_short(12_500.0), "₹12.5k");
        assert_eq!(format_inr_short(900.0), "₹900");
        assert_eq!(format_inr_short(-150_000.0), "₹-1.50L");
    }
}
