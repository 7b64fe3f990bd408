//! Integration tests for resolving complete resume documents

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vitae::domain::schema::{FieldSpec, Schema};
use vitae::domain::{ListVariant, Node, RecordKind, Resolver, TagRegistry};
use vitae::error::VitaeError;

fn write(dir: &Path, name: &str, content: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

fn lines(node: &Node) -> Vec<String> {
    node.as_sequence()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_full_resume_document() {
    let app = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();

    write(
        shared.path(),
        "contact/personal.yaml",
        "\
!personal-data
first_name: Ada
last_name: Lovelace
desired_title: Analyst
mobile: '555-0100'
email: ada@example.com
address: !address {street: 12 St James's Sq, city: London, state: LDN, zip: SW1Y}
",
    );
    write(
        shared.path(),
        "positions.yaml",
        "\
- !position
  start: 1842
  end: 1843
  title: Translator
  company: Taylor's Scientific Memoirs
  location: London
  description: Notes on the Analytical Engine
",
    );
    write(
        app.path(),
        "resume.yaml",
        "\
theme: !resume-theme {color: blue, style: classic}
personal: !include personal
positions: !include positions.yml
heading: !tex-section Skills
skills: !items-computer
  - {title: Mathematics, description: expert}
  - {title: Poetry, description: fluent}
languages: !items-line
  - {title: English, description: native}
  - French
",
    );
    // `positions.yml` resolves to `positions.yaml`: the extension is stripped before lookup

    let resolver = Resolver::new(TagRegistry::builtin()).with_shared_dir(shared.path());
    let resume = resolver.load_named("resume", Some(app.path())).unwrap();

    match resume.get("theme") {
        Some(Node::Record(theme)) => {
            assert_eq!(theme.kind(), RecordKind::Theme);
            assert_eq!(theme.format("{style}-{color}", "{}").unwrap(), "classic-blue");
        }
        other => panic!("Expected theme record, got {:?}", other),
    }

    match resume.get("personal") {
        Some(Node::Record(personal)) => {
            assert_eq!(personal.kind(), RecordKind::PersonalData);
            assert_eq!(
                personal.format("%(first_name)s %(last_name)s", "%").unwrap(),
                "Ada Lovelace"
            );
            assert!(matches!(personal.get("address"), Some(Node::Record(_))));
        }
        other => panic!("Expected personal data record, got {:?}", other),
    }

    let positions = resume.get("positions").and_then(Node::as_sequence).unwrap();
    assert_eq!(positions.len(), 1);

    assert_eq!(resume.get("heading"), Some(&Node::from(r"\section{Skills}")));
    assert_eq!(
        lines(resume.get("skills").unwrap()),
        vec![r"\cvcomputer{Mathematics}{expert}{Poetry}{fluent}"]
    );
    assert_eq!(
        lines(resume.get("languages").unwrap()),
        vec![r"\cvline{English}{native}", r"\cvline{French}{}"]
    );
}

#[test]
fn test_include_round_trip_matches_inline() {
    let dir = TempDir::new().unwrap();
    let fragment = "title: !emph Engineer\nskills: !items-single [{title: A, description: B}]\n";
    write(dir.path(), "fragment.yaml", fragment);

    let resolver = Resolver::default();
    let included = resolver.load_str("!include fragment", Some(dir.path())).unwrap();
    let inlined = resolver.load_str(fragment, None).unwrap();
    assert_eq!(included, inlined);
    assert_eq!(lines(inlined.get("skills").unwrap()), vec![r"\cvlistitem{A: B}"]);
}

#[test]
fn test_include_finds_yml_documents() {
    let app = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    write(shared.path(), "skills.yml", "- Rust\n- Go\n");
    write(app.path(), "resume.yml", "skills: !include skills\n");

    let resolver = Resolver::default().with_shared_dir(shared.path());
    let resume = resolver.load_named("resume", Some(app.path())).unwrap();
    assert_eq!(lines(resume.get("skills").unwrap()), vec!["Rust", "Go"]);
}

#[test]
fn test_empty_lists_for_every_variant() {
    let resolver = Resolver::default();
    for (suffix, _) in ListVariant::builtin() {
        let node = resolver.load_str(&format!("!items-{} []", suffix), None).unwrap();
        assert_eq!(node, Node::Sequence(vec![]), "{}", suffix);
    }
}

#[test]
fn test_single_variant_fallbacks() {
    let resolver = Resolver::default();
    let node = resolver
        .load_str("!items-single [{title: A}, {title: A, description: B}]", None)
        .unwrap();
    assert_eq!(lines(&node), vec![r"\cvlistitem{A}", r"\cvlistitem{A: B}"]);
}

#[test]
fn test_subitems_follow_their_parent() {
    let text = "\
!items-single
- title: Languages
  items: [Rust, Go]
- Tooling
";
    let node = Resolver::default().load_str(text, None).unwrap();
    assert_eq!(
        lines(&node),
        vec![
            r"\cvlistitem{Languages}",
            "Rust",
            "Go",
            r"\cvlistitem{Tooling}",
        ]
    );
}

#[test]
fn test_record_errors_are_schema_errors() {
    let resolver = Resolver::default();
    assert!(matches!(
        resolver.load_str("!position {title: x}", None),
        Err(VitaeError::Schema(_))
    ));
    assert!(matches!(
        resolver.load_str("!resume-theme {color: a, style: b, extra: c}", None),
        Err(VitaeError::Schema(msg)) if msg.contains("extra")
    ));
}

#[test]
fn test_custom_registrations() {
    let mut tags = TagRegistry::builtin();
    tags.register_style("sc", r"\textsc{%s}");
    tags.register_list(
        "pairs",
        ListVariant::new("cvpair", 1, &[&[Some("%(left)s"), Some("%(right)s")]], &[Some("%s"), None]),
    );
    tags.schemas_mut().register(
        "theme",
        Schema::new(RecordKind::Theme, vec![FieldSpec::required("color")]),
    );

    let resolver = Resolver::new(tags);
    assert_eq!(
        resolver.load_str("!sc Name", None).unwrap(),
        Node::from(r"\textsc{Name}")
    );
    assert_eq!(
        lines(&resolver.load_str("!items-pairs [{left: a, right: b}]", None).unwrap()),
        vec![r"\cvpair{a}{b}"]
    );
    // the replacement theme schema no longer requires `style`
    assert!(resolver.load_str("!resume-theme {color: red}", None).is_ok());
}

#[test]
fn test_missing_include_reports_search_path() {
    let doc = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    let resolver = Resolver::default().with_shared_dir(shared.path());

    match resolver.load_str("!include nowhere", Some(doc.path())) {
        Err(VitaeError::ConfigNotFound { name, searched }) => {
            assert_eq!(name, "nowhere");
            assert_eq!(searched, vec![doc.path().to_path_buf(), shared.path().to_path_buf()]);
        }
        other => panic!("Expected ConfigNotFound, got {:?}", other),
    }
}

#[test]
fn test_self_include_is_a_cycle() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "loop.yaml", "again: !include loop\n");

    let err = Resolver::default()
        .load_file(&dir.path().join("loop.yaml"))
        .unwrap_err();
    assert!(matches!(
        err,
        VitaeError::DocumentLoad { source, .. } if matches!(*source, VitaeError::IncludeCycle(_))
    ));
}
