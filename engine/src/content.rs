use std::collections::HashMap;

pub const SAMPLE_MONSTER: &str = "hobgoblin_scout";

pub fn builtin_monsters() -> HashMap<&'static str, &'static str> {
    HashMap::from([(
        SAMPLE_MONSTER,
        include_str!("../content/monsters/hobgoblin_scout.json"),
    )])
}
