use proptest::prelude::*;
use rpgpanel::{critify, roll_expr, Dice, DiceExpr, PanelError, Term};

#[test]
fn whitespace_and_case_are_ignored() {
    let e = DiceExpr::parse(" 2D6 + 1d4 - 1 ").unwrap();
    assert_eq!(e.to_string(), "2d6+1d4-1");
}

#[test]
fn scripted_roll_totals_every_term() {
    let mut dice = Dice::from_scripted(vec![6, 1, 4]);
    let r = roll_expr("2d6-1d4+3", &mut dice).unwrap();
    assert_eq!(r.total, 6 + 1 - 4 + 3);
    assert_eq!(r.modifier(), 3);
    assert_eq!(r.dice_rolls().collect::<Vec<_>>(), vec![6, 1, 4]);
}

#[test]
fn rejects_malformed_input() {
    for bad in ["", "   ", "d", "2d", "1d0", "2d6+", "+", "2x6", "1d6++2", "99999999999"] {
        assert!(
            matches!(DiceExpr::parse(bad), Err(PanelError::InvalidExpression { .. })),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn dice_count_is_capped() {
    assert!(DiceExpr::parse("1000d6").is_ok());
    assert!(DiceExpr::parse("1001d6").is_err());
}

#[test]
fn critify_doubles_each_dice_term() {
    assert_eq!(critify("1d8+3").unwrap(), "2d8+3");
    assert_eq!(critify("2d6+1d4-1").unwrap(), "4d6+2d4-1");
    assert_eq!(critify("-1d4+5").unwrap(), "-2d4+5");
    assert_eq!(critify("7").unwrap(), "7");
    assert!(critify("1d").is_err());
}

#[test]
fn totals_that_could_overflow_are_rejected() {
    for bad in ["2147483647+1", "1d4294967295", "1000d1000000+1000d1000000", "-2147483647-1d2"] {
        assert!(
            matches!(DiceExpr::parse(bad), Err(PanelError::InvalidExpression { .. })),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn largest_dice_roll_without_wrapping() {
    let mut dice = Dice::from_scripted(vec![1_000_000]);
    let r = roll_expr("1000d1000000", &mut dice).unwrap();
    assert_eq!(r.total, 1_000_000_000);

    let crit = DiceExpr::parse("1000d1000000").unwrap().critified();
    assert_eq!(crit.roll(&mut dice).total, 2_000_000_000);
}

#[test]
fn critified_terms_may_pass_the_typed_cap() {
    let crit = DiceExpr::parse("1000d6+2").unwrap().critified();
    assert_eq!(crit.to_string(), "2000d6+2");
    let r = crit.roll(&mut Dice::from_scripted(vec![6]));
    assert_eq!(r.dice_rolls().count(), 2000);
    assert_eq!(r.total, 12_002);
}

proptest! {
    #[test]
    fn ndm_plus_k_stays_in_bounds(n in 1u32..20, s in 1u32..100, k in -50i32..50, seed: u64) {
        let src = format!("{n}d{s}{k:+}");
        let r = roll_expr(&src, &mut Dice::from_seed(seed)).unwrap();
        let lo = n as i32 + k;
        let hi = (n * s) as i32 + k;
        prop_assert!(r.total >= lo && r.total <= hi, "{} rolled {}", src, r.total);
        prop_assert_eq!(r.dice_rolls().count(), n as usize);
    }

    #[test]
    fn normalized_text_reparses_to_the_same_terms(n in 1u32..50, s in 1u32..1000, k in -99i32..99) {
        let e = DiceExpr::parse(&format!("{n}d{s}{k:+}")).unwrap();
        let again = DiceExpr::parse(&e.to_string()).unwrap();
        prop_assert_eq!(e.terms(), again.terms());
    }

    #[test]
    fn critify_keeps_flat_terms(n in 1u32..400, s in 1u32..100, k in 0i32..20) {
        let crit = DiceExpr::parse(&critify(&format!("{n}d{s}+{k}")).unwrap()).unwrap();
        prop_assert_eq!(
            crit.terms(),
            &[Term::Dice { negative: false, count: n * 2, sides: s }, Term::Flat { value: k }][..]
        );
    }
}
