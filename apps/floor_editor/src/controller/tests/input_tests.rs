use super::*;

#[test]
fn parses_cell_commands() {
    assert_eq!(
        parse("click 2 3"),
        Ok(ShellCommand::Click(Coord::new(2, 3)))
    );
    assert_eq!(
        parse("  GOAL 5 5 "),
        Ok(ShellCommand::Goal(Coord::new(5, 5)))
    );
    assert_eq!(parse("select 1"), Err("usage: select ROW COL".to_string()));
    assert_eq!(
        parse("start a 1"),
        Err("'a' is not a cell index".to_string())
    );
}

#[test]
fn parses_actions() {
    assert_eq!(
        parse("add-obstacle"),
        Ok(ShellCommand::Action(ActionKind::AddObstacle))
    );
    assert_eq!(
        parse("modify-shelf"),
        Ok(ShellCommand::Action(ActionKind::ModifyShelf))
    );
}

#[test]
fn form_leaves_missing_and_dash_fields_blank() {
    assert_eq!(
        parse("form tulip red 5"),
        Ok(ShellCommand::Form(ShelfFields::new("tulip", "red", "5")))
    );
    assert_eq!(
        parse("form tulip"),
        Ok(ShellCommand::Form(ShelfFields::new("tulip", "", "")))
    );
    assert_eq!(
        parse("form - - 12"),
        Ok(ShellCommand::Form(ShelfFields::new("", "", "12")))
    );
    assert_eq!(parse("form"), Ok(ShellCommand::Form(ShelfFields::default())));
    assert!(parse("form a b c d").is_err());
}

#[test]
fn resize_needs_a_size_in_range() {
    assert_eq!(parse("resize 8"), Ok(ShellCommand::Resize(8)));
    assert_eq!(
        parse("resize big"),
        Err("grid size must be between 1 and 500".to_string())
    );
    assert!(parse("resize 0").is_err());
    assert!(parse("resize 200000").is_err());
    assert!(parse("resize 18446744073709551616").is_err());
}

#[test]
fn blank_line_shows_grid_and_unknown_is_rejected() {
    assert_eq!(parse("   "), Ok(ShellCommand::Show));
    assert_eq!(
        parse("fly"),
        Err("unknown command 'fly'; type 'help'".to_string())
    );
}

#[test]
fn confirmation_answers() {
    assert!(is_yes("Y"));
    assert!(is_yes(" yes\n"));
    assert!(!is_yes(""));
    assert!(!is_yes("no"));
}
