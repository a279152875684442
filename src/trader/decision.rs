//! Pure momentum decision rule (§4.7) and its gating filters.
//!
//! Kept free of I/O so the decision table and the gates can each be tested
//! directly against literal inputs.

/// Decide the next order given the current signed position and the latest
/// top-of-book prices, per the decision table in §4.7.
///
/// Returns `(order_qty, limit_price)`. `order_qty` is the signed quantity to
/// submit (0 means no action); `limit_price` is the corresponding price in
/// cents, `None` when `order_qty` is 0.
pub fn decide_trade(signed_qty: i64, p_yes: i64, p_no: i64) -> (i64, Option<i64>) {
    match signed_qty {
        1 if p_yes < p_no => (-2, Some(p_no)),
        -1 if p_no < p_yes => (2, Some(p_yes)),
        0 if p_yes < p_no => (-1, Some(p_no)),
        0 if p_no < p_yes => (1, Some(p_yes)),
        _ => (0, None),
    }
}

/// Parse a `"P@Q"` / `"N/A"` top-of-book side string into `(price, qty)`.
pub fn parse_side(s: &str) -> Option<(i64, i64)> {
    if s == "N/A" {
        return None;
    }
    let (price, qty) = s.split_once('@')?;
    Some((price.parse().ok()?, qty.parse().ok()?))
}

/// All gating filters from §4.7 must hold before an order is submitted.
#[allow(clippy::too_many_arguments)]
pub fn passes_gates(
    p_yes: Option<i64>,
    p_no: Option<i64>,
    order_qty: i64,
    balance_cents: i64,
    max_price: i64,
    min_edge: i64,
) -> bool {
    if order_qty == 0 {
        return false;
    }
    let (Some(p_yes), Some(p_no)) = (p_yes, p_no) else {
        return false;
    };
    if p_yes.max(p_no) > max_price {
        return false;
    }
    if (p_no - p_yes).abs() < min_edge {
        return false;
    }
    balance_cents >= 100 * order_qty.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_short_from_long() {
        assert_eq!(decide_trade(1, 40, 50), (-2, Some(50)));
    }

    #[test]
    fn test_flip_long_from_short() {
        assert_eq!(decide_trade(-1, 40, 50), (2, Some(40)));
    }

    #[test]
    fn test_open_short_from_flat() {
        assert_eq!(decide_trade(0, 40, 50), (-1, Some(50)));
    }

    #[test]
    fn test_open_long_from_flat() {
        assert_eq!(decide_trade(0, 80, 10), (1, Some(80)));
    }

    #[test]
    fn test_holds_when_momentum_does_not_favor_a_flip() {
        assert_eq!(decide_trade(1, 60, 50), (0, None));
        assert_eq!(decide_trade(-1, 60, 50), (0, None));
        assert_eq!(decide_trade(0, 50, 50), (0, None));
    }

    #[test]
    fn test_parse_side_present_and_absent() {
        assert_eq!(parse_side("60@7"), Some((60, 7)));
        assert_eq!(parse_side("N/A"), None);
    }

    #[test]
    fn test_trader_opens_long_example() {
        // Position T = 0, balance = 1000 cents, {T, yes:"80@1", no:"10@1"}.
        let (p_yes, _) = parse_side("80@1").unwrap();
        let (p_no, _) = parse_side("10@1").unwrap();
        let (order_qty, price) = decide_trade(0, p_yes, p_no);
        assert_eq!(order_qty, 1);
        assert_eq!(price, Some(80));
        assert!(passes_gates(Some(p_yes), Some(p_no), order_qty, 1000, 97, 66));
    }

    #[test]
    fn test_trader_skips_on_tight_spread() {
        let (p_yes, _) = parse_side("50@1").unwrap();
        let (p_no, _) = parse_side("49@1").unwrap();
        let (order_qty, _) = decide_trade(0, p_yes, p_no);
        assert_eq!(order_qty, -1);
        assert!(!passes_gates(Some(p_yes), Some(p_no), order_qty, 1000, 97, 66));
    }

    #[test]
    fn test_gates_reject_saturated_book() {
        assert!(!passes_gates(Some(99), Some(1), 1, 10_000, 97, 66));
    }

    #[test]
    fn test_gates_reject_insufficient_balance() {
        assert!(!passes_gates(Some(80), Some(10), 1, 50, 97, 66));
    }

    #[test]
    fn test_gates_reject_missing_side() {
        assert!(!passes_gates(None, Some(10), 1, 10_000, 97, 66));
    }
}
