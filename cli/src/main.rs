use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use encoding_rs::Encoding;
use rpgpanel::config::{init_logging, Config};
use rpgpanel::media::{MediaKind, MediaLibrary};
use rpgpanel::pdf_import::import_character_from_pdf;
use rpgpanel::storage::new_id;
use rpgpanel::{
    check, critify, resolve_attack, roll_d20, roll_expr, AdMode, Character, CheckInput,
    CheckTarget, Combatant, CombatantKind, Dice, DiceExpr, Encounter, Monster, PasswordGate,
    RollResult, Session, Store, Weapon,
};

#[derive(Parser)]
#[command(name = "rpgpanel")]
#[command(about = "Tabletop helper: dice, character sheets, monsters and combat turns")]
struct Cli {
    /// Config file (defaults to ./rpgpanel.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a dice expression such as 2d6+1d4+3
    Roll {
        #[arg(allow_hyphen_values = true)]
        expr: String,
        /// How many times to roll it
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Roll a d20 with a bonus and optional advantage/disadvantage
    D20 {
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        bonus: i32,
        #[arg(long)]
        adv: bool,
        #[arg(long)]
        dis: bool,
    },
    /// Print the critical-hit version of a damage expression
    Crit {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Show or clear the session log
    Log {
        #[arg(long)]
        clear: bool,
        /// Lines to show
        #[arg(long, default_value_t = 20)]
        lines: usize,
    },
    /// Character sheets
    #[command(subcommand)]
    Character(CharacterCmd),
    /// Password-protected bestiary
    Monster(MonsterArgs),
    /// Combat encounters and turn order
    #[command(subcommand)]
    Encounter(EncounterCmd),
    /// Audio/video picked for the table
    #[command(subcommand)]
    Media(MediaCmd),
}

#[derive(Subcommand)]
enum CharacterCmd {
    List,
    Show { id: String },
    /// Create a character from flags
    New(NewCharacter),
    Delete { id: String },
    /// Import a filled-in character sheet PDF
    ImportPdf { file: PathBuf },
    /// Roll a weapon's attack and damage
    RollWeapon {
        id: String,
        weapon: String,
        #[arg(long)]
        adv: bool,
        #[arg(long)]
        dis: bool,
        /// Target AC (0 = ignore)
        #[arg(long, default_value_t = 0)]
        ac: i32,
        /// Roll critical damage on a hit regardless of the die
        #[arg(long)]
        crit: bool,
    },
    /// Ability check, skill check or saving throw
    Check {
        id: String,
        /// Skill or ability, e.g. stealth, dex, wisdom
        target: String,
        /// Saving throw with the named ability
        #[arg(long)]
        save: bool,
        #[arg(long)]
        adv: bool,
        #[arg(long)]
        dis: bool,
        #[arg(long, allow_hyphen_values = true)]
        dc: Option<i32>,
    },
    /// Damage roll for one weapon, without an attack
    Damage {
        id: String,
        weapon: String,
        #[arg(long)]
        crit: bool,
    },
    /// Replace the equipment list (no items clears it)
    SetEquipment { id: String, items: Vec<String> },
}

#[derive(Args)]
struct NewCharacter {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    player: String,
    #[arg(long, default_value = "")]
    species: String,
    #[arg(long = "class", default_value = "")]
    class_and_level: String,
    #[arg(long, default_value_t = 1)]
    level: i32,
    /// Six scores in STR,DEX,CON,INT,WIS,CHA order
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    scores: Option<Vec<i32>>,
    #[arg(long, default_value_t = 10)]
    ac: i32,
    #[arg(long, default_value_t = 30)]
    speed: i32,
    #[arg(long, default_value_t = 10)]
    hp: i32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    init: i32,
    /// Weapon as NAME:BONUS:DAMAGE[:TYPE], repeatable
    #[arg(long = "weapon")]
    weapons: Vec<String>,
}

#[derive(Args)]
struct MonsterArgs {
    /// Shared monster password
    #[arg(long, env = "RPGPANEL_PASSWORD")]
    password: Option<String>,
    #[command(subcommand)]
    cmd: MonsterCmd,
}

#[derive(Subcommand)]
enum MonsterCmd {
    List,
    Show { id: String },
    /// Save the built-in sample monster
    Sample,
    /// Import a monster from a JSON file
    Import { file: PathBuf },
    Delete { id: String },
    /// Attack roll for one of the monster's actions
    Attack {
        id: String,
        action: String,
        /// Target AC (0 = ignore)
        #[arg(long, default_value_t = 0)]
        ac: i32,
        #[arg(long)]
        adv: bool,
        #[arg(long)]
        dis: bool,
        /// Do not roll damage automatically on a hit
        #[arg(long)]
        no_damage: bool,
    },
    /// Damage roll for one of the monster's actions
    Damage { id: String, action: String },
}

#[derive(Subcommand)]
enum EncounterCmd {
    /// Create an empty encounter and make it current
    New {
        #[arg(long, default_value = "Encounter")]
        title: String,
    },
    List,
    /// Make a saved encounter current
    Open { id: String },
    Delete,
    #[command(flatten)]
    Edit(EncounterEdit),
}

/// Commands that load, change and save the current encounter.
#[derive(Subcommand)]
enum EncounterEdit {
    Show,
    /// Add saved characters by id
    AddPc { ids: Vec<String> },
    /// Add a monster or NPC by hand
    AddMonster {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        init: i32,
        #[arg(long, default_value_t = 12)]
        ac: i32,
        #[arg(long, default_value_t = 7)]
        hp: i32,
        #[arg(long)]
        npc: bool,
    },
    /// Add a saved monster from the bestiary
    AddBeast {
        id: String,
        #[arg(long, env = "RPGPANEL_PASSWORD")]
        password: Option<String>,
    },
    Remove { index: usize },
    RollInit,
    Next,
    Prev,
    NewRound,
    /// Reset round, initiative and conditions but keep the combatants
    Clear,
    /// Set HP; negative values clamp to 0
    Hp {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        hp: i32,
    },
    Condition { index: usize, tag: String },
    ClearConditions { index: usize },
    Title { title: String },
}

#[derive(Subcommand)]
enum MediaCmd {
    List,
    /// Local file name or URL; empty string clears
    SetAudio { pick: String },
    SetVideo { pick: String },
}

struct Ctx {
    config: Config,
    store: Store,
    session: Session,
    dice: Dice,
}

impl Ctx {
    fn current_encounter(&self) -> Result<Encounter> {
        let id = self
            .session
            .encounter_id
            .as_deref()
            .context("no current encounter; run `encounter new` or `encounter open`")?;
        self.store
            .load_encounter(id)
            .with_context(|| format!("encounter '{}' not found", id))
    }

    fn gate(&self) -> PasswordGate {
        PasswordGate::new(self.config.monster_password.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .context("failed to load config")?
        .apply_env(|key| std::env::var(key).ok());
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_logging(config.level(), cli.verbose);

    let store = Store::open(&config.data_dir)
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
    let session = Session::load(&store, config.log_limit);
    let dice = match cli.seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    };
    let mut ctx = Ctx { config, store, session, dice };

    match cli.cmd {
        Cmd::Roll { expr, times } => {
            for _ in 0..times.max(1) {
                let roll = RollResult::from(roll_expr(&expr, &mut ctx.dice)?);
                println!("{}", ctx.session.record(None, &roll));
            }
        }
        Cmd::D20 { bonus, adv, dis } => {
            let roll = RollResult::from(roll_d20(&mut ctx.dice, bonus, adv, dis));
            println!("{}", ctx.session.record(None, &roll));
        }
        Cmd::Crit { expr } => println!("{}", critify(&expr)?),
        Cmd::Log { clear, lines } => {
            if clear {
                ctx.session.log.clear();
                println!("log cleared");
            } else {
                for line in ctx.session.log.lines().iter().take(lines) {
                    println!("{}", line);
                }
            }
        }
        Cmd::Character(cmd) => character(&mut ctx, cmd)?,
        Cmd::Monster(args) => monster(&mut ctx, args)?,
        Cmd::Encounter(cmd) => encounter(&mut ctx, cmd)?,
        Cmd::Media(cmd) => media(&mut ctx, cmd)?,
    }

    ctx.session.save(&ctx.store).context("failed to save session")?;
    Ok(())
}

fn parse_weapon(raw: &str) -> Result<Weapon> {
    let parts: Vec<&str> = raw.split(':').collect();
    if !(3..=4).contains(&parts.len()) {
        bail!("invalid weapon '{}' (expected NAME:BONUS:DAMAGE[:TYPE])", raw);
    }
    DiceExpr::parse(parts[2])?;
    let mut weapon = Weapon {
        name: parts[0].trim().to_string(),
        attack_bonus: parts[1].trim().parse().with_context(|| format!("bad bonus in '{}'", raw))?,
        damage: parts[2].trim().to_string(),
        ..Weapon::default()
    };
    if let Some(kind) = parts.get(3) {
        weapon.damage_type = kind.trim().to_string();
    }
    Ok(weapon)
}

fn character(ctx: &mut Ctx, cmd: CharacterCmd) -> Result<()> {
    match cmd {
        CharacterCmd::List => {
            for id in ctx.store.list_character_ids()? {
                match ctx.store.load_character(&id) {
                    Some(ch) => println!(
                        "{}  {} (AC {}, HP {}/{})",
                        id, ch.character_name, ch.ac, ch.current_hp, ch.max_hp
                    ),
                    None => println!("{}  <unreadable>", id),
                }
            }
        }
        CharacterCmd::Show { id } => {
            let ch = load_character(ctx, &id)?;
            println!("{}", serde_json::to_string_pretty(&ch)?);
        }
        CharacterCmd::New(args) => {
            let mut ch = Character::new(new_id(), args.name);
            ch.player_name = args.player;
            ch.species = args.species;
            ch.class_and_level = args.class_and_level;
            ch.level = args.level;
            if let Some(scores) = args.scores {
                if scores.len() != 6 {
                    bail!("--scores takes six values (STR,DEX,CON,INT,WIS,CHA)");
                }
                for (ability, score) in rpgpanel::Ability::ALL.into_iter().zip(scores) {
                    ch.abilities.set(ability, score);
                }
            }
            ch.ac = args.ac;
            ch.speed = args.speed;
            ch.max_hp = args.hp;
            ch.current_hp = args.hp;
            ch.initiative_bonus = args.init;
            ch.weapons = args.weapons.iter().map(|w| parse_weapon(w)).collect::<Result<_>>()?;
            ch.validate()?;
            ctx.store.save_character(&ch)?;
            println!("{}", ch.id);
        }
        CharacterCmd::Delete { id } => {
            if ctx.store.delete_character(&id)? {
                println!("deleted {}", id);
            } else {
                println!("nothing to delete for {}", id);
            }
        }
        CharacterCmd::ImportPdf { file } => {
            let bytes = fs::read(&file)
                .with_context(|| format!("failed to read PDF: {}", file.display()))?;
            let ch = import_character_from_pdf(&bytes, new_id());
            ctx.store.save_character(&ch)?;
            println!("{}  {}", ch.id, ch.character_name);
        }
        CharacterCmd::RollWeapon { id, weapon, adv, dis, ac, crit } => {
            let ch = load_character(ctx, &id)?;
            let w = find_weapon(&ch, &weapon)?;
            let who = format!("{} — {}", ch.character_name, w.name);
            attack_and_damage(
                ctx,
                Attack {
                    who: &who,
                    to_hit: w.attack_bonus,
                    damage: Some(w.damage.as_str()),
                    mode: AdMode::from_flags(adv, dis),
                    ac,
                    auto_damage: true,
                    force_crit: crit,
                },
            )?;
        }
        CharacterCmd::Check { id, target, save, adv, dis, dc } => {
            let ch = load_character(ctx, &id)?;
            let target = CheckTarget::parse(&target, save)?;
            let input =
                CheckInput { modifier: ch.check_mod(target), mode: AdMode::from_flags(adv, dis), dc };
            let res = check(&mut ctx.dice, input);
            let mut line = format!(
                "{} — {}: {}",
                ch.character_name,
                target.label(),
                RollResult::from(res.roll.clone())
            );
            if let (Some(dc), Some(passed)) = (res.dc, res.passed()) {
                let verdict = if passed { "success" } else { "failure" };
                line.push_str(&format!(" vs DC {} → {}", dc, verdict));
            }
            ctx.session.push(line.clone());
            println!("{}", line);
        }
        CharacterCmd::Damage { id, weapon, crit } => {
            let ch = load_character(ctx, &id)?;
            let w = find_weapon(&ch, &weapon)?;
            let expr = DiceExpr::parse(&w.damage)?;
            let who = format!("{} — {}", ch.character_name, w.name);
            roll_damage(ctx, &who, &expr, crit);
        }
        CharacterCmd::SetEquipment { id, items } => {
            let mut ch = load_character(ctx, &id)?;
            ch.equipment = items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            ctx.store.save_character(&ch)?;
            println!("{}: {}", ch.character_name, ch.equipment.join(", "));
        }
    }
    Ok(())
}

fn load_character(ctx: &Ctx, id: &str) -> Result<Character> {
    ctx.store
        .load_character(id)
        .with_context(|| format!("character '{}' not found", id))
}

fn find_weapon<'a>(ch: &'a Character, name: &str) -> Result<&'a Weapon> {
    ch.find_weapon(name)
        .with_context(|| format!("{} has no weapon '{}'", ch.character_name, name))
}

struct Attack<'a> {
    who: &'a str,
    to_hit: i32,
    damage: Option<&'a str>,
    mode: AdMode,
    /// 0 skips the AC comparison.
    ac: i32,
    auto_damage: bool,
    force_crit: bool,
}

/// Rolls to hit and, when it lands, the (critified on a natural 20) damage.
fn attack_and_damage(ctx: &mut Ctx, attack: Attack<'_>) -> Result<()> {
    let Attack { who, to_hit, damage, mode, ac, auto_damage, force_crit } = attack;
    let damage = damage.map(DiceExpr::parse).transpose()?;
    let (roll, outcome) = resolve_attack(&mut ctx.dice, to_hit, mode, Some(ac));
    let line = format!("{}: {} → {}", who, RollResult::from(roll), outcome);
    ctx.session.push(line.clone());
    println!("{}", line);

    if let Some(expr) = damage.filter(|_| outcome.lands() && auto_damage) {
        roll_damage(ctx, who, &expr, outcome.is_crit() || force_crit);
    }
    Ok(())
}

/// Doubled dice may exceed the typed cap, so the critified terms are rolled as-is.
fn roll_damage(ctx: &mut Ctx, who: &str, expr: &DiceExpr, crit: bool) {
    let (expr, tag) = if crit { (expr.critified(), " (crit damage)") } else { (expr.clone(), "") };
    let dmg = RollResult::from(expr.roll(&mut ctx.dice));
    println!("{}", ctx.session.record(Some(&format!("{} damage{}", who, tag)), &dmg));
}

fn load_monster(ctx: &Ctx, id: &str) -> Result<Monster> {
    ctx.store
        .load_monster(id)
        .with_context(|| format!("monster '{}' not found", id))
}

fn monster(ctx: &mut Ctx, args: MonsterArgs) -> Result<()> {
    ctx.gate().unlock(args.password.as_deref())?;
    match args.cmd {
        MonsterCmd::List => {
            for id in ctx.store.list_monster_ids()? {
                if let Some(m) = ctx.store.load_monster(&id) {
                    println!(
                        "{}  {}  AC {} • HP {}/{} • CR {}",
                        id, m.name, m.ac, m.current_hp, m.max_hp, m.cr
                    );
                }
            }
        }
        MonsterCmd::Show { id } => {
            let m = load_monster(ctx, &id)?;
            println!("{}", serde_json::to_string_pretty(&m)?);
        }
        MonsterCmd::Sample => {
            let m = Monster::sample(new_id())?;
            ctx.store.save_monster(&m)?;
            println!("{}  {}", m.id, m.name);
        }
        MonsterCmd::Import { file } => {
            let text = read_text_auto(&file)?;
            let m = Monster::from_json_text(&text, new_id())
                .with_context(|| format!("invalid monster JSON: {}", file.display()))?;
            ctx.store.save_monster(&m)?;
            println!("{}  {}", m.id, m.name);
        }
        MonsterCmd::Delete { id } => {
            if ctx.store.delete_monster(&id)? {
                println!("deleted {}", id);
            } else {
                println!("nothing to delete for {}", id);
            }
        }
        MonsterCmd::Attack { id, action, ac, adv, dis, no_damage } => {
            let m = load_monster(ctx, &id)?;
            let act = m
                .find_action(&action)
                .with_context(|| format!("{} has no action '{}'", m.name, action))?;
            let who = format!("{} — {}", m.name, act.name);
            attack_and_damage(
                ctx,
                Attack {
                    who: &who,
                    to_hit: act.to_hit.unwrap_or(0),
                    damage: act.damage.as_deref(),
                    mode: AdMode::from_flags(adv, dis),
                    ac,
                    auto_damage: !no_damage,
                    force_crit: false,
                },
            )?;
        }
        MonsterCmd::Damage { id, action } => {
            let m = load_monster(ctx, &id)?;
            let act = m
                .find_action(&action)
                .with_context(|| format!("{} has no action '{}'", m.name, action))?;
            match act.damage.as_deref() {
                Some(expr) => {
                    let expr = DiceExpr::parse(expr)?;
                    roll_damage(ctx, &format!("{} — {}", m.name, act.name), &expr, false);
                }
                None => {
                    let line = format!("{} — {}: no damage formula", m.name, act.name);
                    ctx.session.push(line.clone());
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

fn read_text_auto(path: &std::path::Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn print_encounter(enc: &Encounter) {
    println!("{} [{}] — round {}", enc.title, enc.id, enc.round);
    for (idx, c) in enc.combatants.iter().enumerate() {
        let marker = if idx == enc.turn_index { "➡" } else { " " };
        let init = c.initiative_total.map(|t| t.to_string()).unwrap_or_default();
        let ac = c.ac.map(|v| v.to_string()).unwrap_or_default();
        let hp = match (c.hp, c.max_hp) {
            (Some(hp), Some(max)) => format!("{}/{}", hp, max),
            (Some(hp), None) => hp.to_string(),
            _ => String::new(),
        };
        println!(
            "{} {:>2}. {:<24} {:<7} init {:>3}  AC {:>3}  HP {:>7}  {}",
            marker,
            idx,
            c.name,
            c.kind.to_string(),
            init,
            ac,
            hp,
            c.conditions.join(", ")
        );
    }
    if let Some(c) = enc.current() {
        println!("turn: {} ({})", c.name, c.kind);
    }
}

fn encounter(ctx: &mut Ctx, cmd: EncounterCmd) -> Result<()> {
    match cmd {
        EncounterCmd::New { title } => {
            let enc = Encounter::new(new_id(), title);
            ctx.store.save_encounter(&enc)?;
            ctx.session.encounter_id = Some(enc.id.clone());
            println!("{}", enc.id);
        }
        EncounterCmd::List => {
            for id in ctx.store.list_encounter_ids()? {
                if let Some(enc) = ctx.store.load_encounter(&id) {
                    let current = ctx.session.encounter_id.as_deref() == Some(id.as_str());
                    let mark = if current { "*" } else { " " };
                    println!("{} {}  {} ({} combatants)", mark, id, enc.title, enc.len());
                }
            }
        }
        EncounterCmd::Open { id } => {
            let enc = ctx
                .store
                .load_encounter(&id)
                .with_context(|| format!("encounter '{}' not found", id))?;
            ctx.session.encounter_id = Some(enc.id.clone());
            print_encounter(&enc);
        }
        EncounterCmd::Delete => {
            let enc = ctx.current_encounter()?;
            ctx.store.delete_encounter(&enc.id)?;
            ctx.session.encounter_id = None;
            println!("deleted {}", enc.id);
        }
        EncounterCmd::Edit(edit) => {
            let mut enc = ctx.current_encounter()?;
            edit_encounter(ctx, &mut enc, edit)?;
            ctx.store.save_encounter(&enc)?;
            print_encounter(&enc);
        }
    }
    Ok(())
}

fn edit_encounter(ctx: &mut Ctx, enc: &mut Encounter, edit: EncounterEdit) -> Result<()> {
    match edit {
        EncounterEdit::Show => {}
        EncounterEdit::AddPc { ids } => {
            for id in ids {
                match ctx.store.load_character(&id) {
                    Some(ch) => enc.add_combatant(Combatant::from_character(&ch)),
                    None => eprintln!("skipping unknown character {}", id),
                }
            }
        }
        EncounterEdit::AddMonster { name, init, ac, hp, npc } => {
            let kind = if npc { CombatantKind::Npc } else { CombatantKind::Monster };
            enc.add_combatant(Combatant::new(name, kind, init, Some(ac), Some(hp)));
        }
        EncounterEdit::AddBeast { id, password } => {
            ctx.gate().unlock(password.as_deref())?;
            let m = load_monster(ctx, &id)?;
            enc.add_combatant(Combatant::from_monster(&m));
        }
        EncounterEdit::Remove { index } => {
            let c = enc.remove_combatant(index)?;
            println!("removed {}", c.name);
        }
        EncounterEdit::RollInit => {
            enc.roll_initiative(&mut ctx.dice);
            ctx.session.push(format!("Initiative rolled for {}.", enc.title));
        }
        EncounterEdit::Next => enc.advance(),
        EncounterEdit::Prev => enc.retreat(),
        EncounterEdit::NewRound => enc.new_round(),
        EncounterEdit::Clear => enc.clear_combat(),
        EncounterEdit::Hp { index, hp } => {
            enc.set_hp(index, hp)?;
        }
        EncounterEdit::Condition { index, tag } => {
            enc.add_condition(index, &tag)?;
        }
        EncounterEdit::ClearConditions { index } => enc.clear_conditions(index)?,
        EncounterEdit::Title { title } => enc.title = title,
    }
    Ok(())
}

fn media(ctx: &mut Ctx, cmd: MediaCmd) -> Result<()> {
    let library = MediaLibrary::open(&ctx.config.data_dir)?;
    match cmd {
        MediaCmd::List => {
            for (label, kind) in [("audio", MediaKind::Audio), ("video", MediaKind::Video)] {
                println!("{}:", label);
                for name in library.files(kind)? {
                    println!("  {}", name);
                }
            }
            let media = &ctx.session.media;
            println!("selected audio: {}", media.audio.as_deref().unwrap_or("(none)"));
            println!("selected video: {}", media.video.as_deref().unwrap_or("(none)"));
        }
        MediaCmd::SetAudio { pick } => {
            ctx.session.media.audio = library.resolve(MediaKind::Audio, &pick)?;
            println!("audio: {}", ctx.session.media.audio.as_deref().unwrap_or("(none)"));
        }
        MediaCmd::SetVideo { pick } => {
            ctx.session.media.video = library.resolve(MediaKind::Video, &pick)?;
            println!("video: {}", ctx.session.media.video.as_deref().unwrap_or("(none)"));
        }
    }
    Ok(())
}
