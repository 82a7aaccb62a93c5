use lopdf::{Dictionary, Document, Object, ObjectId};
use rpgpanel::pdf_import::{character_from_fields, extract_pdf_fields, import_character_from_pdf, PdfFields};

fn text(value: &str) -> Object {
    Object::string_literal(value)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn field(doc: &mut Document, title: &str, value: Option<Object>, kids: Vec<ObjectId>) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("T", text(title));
    if let Some(v) = value {
        dict.set("V", v);
    }
    if !kids.is_empty() {
        dict.set("Kids", Object::Array(kids.into_iter().map(Object::Reference).collect()));
    }
    doc.add_object(dict)
}

/// A one-page PDF whose AcroForm holds the given top-level fields.
fn form_pdf(build: impl FnOnce(&mut Document) -> Vec<ObjectId>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut page = Dictionary::new();
    page.set("Type", name("Page"));
    page.set("Parent", Object::Reference(pages_id));
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", name("Pages"));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let fields = build(&mut doc);
    let mut form = Dictionary::new();
    form.set("Fields", Object::Array(fields.into_iter().map(Object::Reference).collect()));
    let form_id = doc.add_object(form);

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    catalog.set("AcroForm", Object::Reference(form_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

#[test]
fn english_sheet_fields_map_onto_a_character() {
    let pdf = form_pdf(|doc| {
        vec![
            field(doc, "CharacterName", Some(text("Brina Stonefist")), vec![]),
            field(doc, "ClassLevel", Some(text("Fighter 5")), vec![]),
            field(doc, "STR", Some(text("18")), vec![]),
            field(doc, "DEX", Some(text("12")), vec![]),
            field(doc, "AC", Some(text("18")), vec![]),
            field(doc, "HPMax", Some(text("44")), vec![]),
            field(doc, "Speed", Some(text("25 ft")), vec![]),
            field(doc, "Wpn Name", Some(text("Warhammer")), vec![]),
            field(doc, "Wpn1 AtkBonus", Some(text("+7")), vec![]),
            field(doc, "Wpn1 Damage", Some(text("1d8+4 bludgeoning")), vec![]),
        ]
    });

    let ch = import_character_from_pdf(&pdf, "pdf1");
    assert_eq!(ch.id, "pdf1");
    assert_eq!(ch.character_name, "Brina Stonefist");
    assert_eq!(ch.level, 5);
    assert_eq!(ch.proficiency(), 3);
    assert_eq!((ch.abilities.str_, ch.abilities.dex, ch.abilities.con), (18, 12, 10));
    assert_eq!((ch.ac, ch.max_hp, ch.current_hp, ch.speed), (18, 44, 44, 25));
    assert_eq!(ch.weapons.len(), 1);
    assert_eq!(ch.weapons[0].attack_bonus, 7);
    assert_eq!(ch.weapons[0].damage, "1d8+4");
    assert_eq!(ch.weapons[0].damage_type, "bludgeoning");
    assert_eq!(ch.raw_pdf_fields.get("STR").map(String::as_str), Some("18"));
}

#[test]
fn nested_fields_and_checkboxes_are_collected() {
    let pdf = form_pdf(|doc| {
        let child = field(doc, "Nome", Some(text("Tavi")), vec![]);
        let parent = field(doc, "Dados", None, vec![child]);
        let on = field(doc, "Check Box 11 Perícia - Furtividade", Some(name("Yes")), vec![]);
        let off = field(doc, "Check Box 12 Perícia - Atletismo", Some(name("Off")), vec![]);
        vec![parent, on, off]
    });

    let fields = extract_pdf_fields(&pdf).unwrap();
    assert_eq!(fields.values.get("Dados.Nome").map(String::as_str), Some("Tavi"));
    assert_eq!(fields.checked, ["Check Box 11 Perícia - Furtividade"]);

    let ch = character_from_fields(&fields, "x");
    assert_eq!(ch.skill_proficiencies, ["Stealth"]);
}

#[test]
fn portuguese_names_win_over_english_ones() {
    let mut fields = PdfFields::default();
    fields.values.insert("Nome do Personagem".into(), "Aurora".into());
    fields.values.insert("CharacterName".into(), "Dawn".into());
    fields.values.insert("Força".into(), "40".into());
    fields.values.insert("Deslocamento".into(), "9 m".into());
    fields.values.insert("Pontos de Vida Máximo".into(), "31".into());
    fields.values.insert("Pontos de Vida Atual".into(), "0".into());
    fields.values.insert("Equipamento".into(), "corda, tocha\nmochila".into());
    fields.checked.push("Check Box 3 Teste de Resistência - Sabedoria".into());

    let ch = character_from_fields(&fields, "pt");
    assert_eq!(ch.character_name, "Aurora");
    assert_eq!(ch.abilities.str_, 30);
    assert_eq!(ch.speed, 30);
    assert_eq!(ch.current_hp, 31);
    assert_eq!(ch.equipment, ["corda", "tocha", "mochila"]);
    assert_eq!(ch.save_proficiencies, ["WIS"]);
    assert!(ch.validate().is_ok());
}

#[test]
fn unreadable_bytes_give_a_default_character() {
    let ch = import_character_from_pdf(b"%PDF-1.4 truncated", "junk");
    assert_eq!(ch.id, "junk");
    assert_eq!(ch.character_name, "Unnamed");
    assert!(ch.weapons.is_empty());
    assert_eq!(ch.abilities.wis, 10);
}

#[test]
fn form_without_fields_falls_back_per_field() {
    let pdf = form_pdf(|_| Vec::new());
    let ch = import_character_from_pdf(&pdf, "blank");
    assert_eq!(ch.character_name, "Unnamed");
    assert_eq!((ch.ac, ch.speed, ch.max_hp), (10, 30, 10));
}
