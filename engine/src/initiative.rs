use std::cmp::Ordering;

use tracing::debug;

use crate::encounter::Combatant;
use crate::Dice;

/// Roll a d20 for every combatant, record roll and total, then sort.
pub fn roll_initiative(combatants: &mut [Combatant], dice: &mut Dice) {
    for c in combatants.iter_mut() {
        let roll = dice.roll(20) as i32;
        c.initiative_roll = Some(roll);
        c.initiative_total = Some(roll + c.initiative_bonus);
        debug!(name = %c.name, roll, total = roll + c.initiative_bonus, "initiative");
    }
    sort_by_initiative(combatants);
}

/// Descending by total, then raw roll, then name. Unrolled counts as 0.
pub fn initiative_order(a: &Combatant, b: &Combatant) -> Ordering {
    let key = |c: &Combatant| {
        (
            c.initiative_total.unwrap_or(0),
            c.initiative_roll.unwrap_or(0),
        )
    };
    key(b).cmp(&key(a)).then_with(|| b.name.cmp(&a.name))
}

pub fn sort_by_initiative(combatants: &mut [Combatant]) {
    combatants.sort_by(initiative_order);
}

pub fn next_turn(current: usize, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (current + 1) % n
}

pub fn prev_turn(current: usize, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (current as isize - 1).rem_euclid(n as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::CombatantKind;

    fn rolled(name: &str, roll: i32, total: i32) -> Combatant {
        let mut c = Combatant::new(name, CombatantKind::Monster, total - roll, None, None);
        c.initiative_roll = Some(roll);
        c.initiative_total = Some(total);
        c
    }

    #[test]
    fn ties_break_on_roll_then_name() {
        let mut list = vec![
            rolled("Ana", 10, 14),
            rolled("Bram", 12, 14),
            rolled("Cid", 12, 14),
            rolled("Dax", 3, 18),
        ];
        sort_by_initiative(&mut list);
        let names: Vec<_> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Dax", "Cid", "Bram", "Ana"]);
    }

    #[test]
    fn unrolled_sort_last() {
        let mut list = vec![
            Combatant::new("Zed", CombatantKind::Npc, 5, None, None),
            rolled("Orc", 1, 1),
        ];
        sort_by_initiative(&mut list);
        assert_eq!(list[0].name, "Orc");
    }

    #[test]
    fn turn_arithmetic_wraps() {
        assert_eq!(next_turn(2, 3), 0);
        assert_eq!(prev_turn(0, 3), 2);
        assert_eq!(next_turn(5, 0), 0);
        assert_eq!(prev_turn(0, 0), 0);
    }
}
