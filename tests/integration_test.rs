use helper::test_with;
use indoc::indoc;
use tableau::load;
use tableau::scene::{FALLBACK_MATERIAL, SPHERE};

mod helper;

#[test]
fn test_minimal() {
    test_with("minimal");
}

#[test]
fn test_constants() {
    test_with("constants");
}

#[test]
fn test_groups() {
    test_with("groups");
}

#[test]
fn test_builtins() {
    test_with("builtins");
}

#[test]
fn test_syntax_errors() {
    test_with("syntax_errors");
}

#[test]
fn test_lexical_error() {
    test_with("lexical_error");
}

#[test]
fn test_redefinition() {
    test_with("redefinition");
}

#[test]
fn test_unbound_name() {
    test_with("unbound_name");
}

#[test]
fn test_dimension_mismatch() {
    test_with("dimension_mismatch");
}

#[test]
fn test_handler_error() {
    test_with("handler_error");
}

#[test]
fn test_load_scene() {
    let code = indoc! {"
        $material Red(color=(1, 0, 0))
        $group World()
        $group World:Lamp(position=(0, 2, 0), material=Red)
        World:Lamp:sphere(size=0.25, material=Red)
        cube()
    "};
    let scene = load(code).unwrap();
    assert_eq!(scene.groups.len(), 2);
    assert_eq!(scene.materials.len(), 1);
    assert_eq!(scene.count(SPHERE), 1);
    assert_eq!(scene.shapes[0].group, Some(1));
    assert_eq!(scene.material_of(&scene.shapes[1]), &*FALLBACK_MATERIAL);
}

#[test]
fn test_load_reports_handler_errors() {
    let error = load("cone()").unwrap_err();
    assert_eq!(error.to_string(), "line 1: cone: unknown shape type 'cone'");
}
