//! Parsing of shell lines into commands.

use shared::domain::Coord;
use warehouse_core::{ActionKind, ShelfFields, MAX_GRID_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Connect,
    Click(Coord),
    Select(Coord),
    Action(ActionKind),
    Form(ShelfFields),
    Cancel,
    Simulate,
    Start(Coord),
    Goal(Coord),
    Run,
    Exit,
    Inventory,
    Resize(usize),
    Restart,
    Show,
    Log,
    Help,
    Quit,
}

pub const HELP: &str = "\
connect                  load obstacles and shelves from the inventory service
click R C                click a cell (select while editing, start/goal while simulating)
select R C               toggle a cell in the selection
add-shelf                open the shelf form for the selected cells
remove-shelf             clear selected shelves
modify-shelf             edit the single selected shelf
add-obstacle             turn selected empty cells into obstacles
remove-obstacle          clear selected obstacles
form [FLOWER COLOR QTY]  submit the open shelf form; omitted or - fields keep the shown value
cancel                   close the shelf form and undo its changes
simulate                 enter simulation mode
start R C                place the start cell
goal R C                 add or remove a goal cell
run                      compute the path from start through the goals
exit                     leave simulation mode
inventory                list stock of the selected shelves (or all shelves)
resize N                 replace the grid with an empty N x N grid
restart                  wipe the map here and on the service
show                     print the grid
log                      print the message log
help                     print this help
quit                     leave the editor";

/// Blank lines parse as `Show`.
pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Show);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "connect" => ShellCommand::Connect,
        "click" => ShellCommand::Click(coord_arg(verb, &args)?),
        "select" => ShellCommand::Select(coord_arg(verb, &args)?),
        "add-shelf" => ShellCommand::Action(ActionKind::AddShelf),
        "remove-shelf" => ShellCommand::Action(ActionKind::RemoveShelf),
        "modify-shelf" => ShellCommand::Action(ActionKind::ModifyShelf),
        "add-obstacle" => ShellCommand::Action(ActionKind::AddObstacle),
        "remove-obstacle" => ShellCommand::Action(ActionKind::RemoveObstacle),
        "form" => {
            if args.len() > 3 {
                return Err("usage: form [FLOWER COLOR QTY]".to_string());
            }
            let field = |idx: usize| match args.get(idx).copied() {
                Some("-") | None => "",
                Some(word) => word,
            };
            ShellCommand::Form(ShelfFields::new(field(0), field(1), field(2)))
        }
        "cancel" => ShellCommand::Cancel,
        "simulate" => ShellCommand::Simulate,
        "start" => ShellCommand::Start(coord_arg(verb, &args)?),
        "goal" => ShellCommand::Goal(coord_arg(verb, &args)?),
        "run" => ShellCommand::Run,
        "exit" => ShellCommand::Exit,
        "inventory" => ShellCommand::Inventory,
        "resize" => match args.as_slice() {
            [size] => ShellCommand::Resize(grid_size(size)?),
            _ => return Err("usage: resize N".to_string()),
        },
        "restart" => ShellCommand::Restart,
        "show" => ShellCommand::Show,
        "log" => ShellCommand::Log,
        "help" | "?" => ShellCommand::Help,
        "quit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(command)
}

fn coord_arg(verb: &str, args: &[&str]) -> Result<Coord, String> {
    let [row, col] = args else {
        return Err(format!("usage: {verb} ROW COL"));
    };
    let number = |text: &str| {
        text.parse::<usize>()
            .map_err(|_| format!("'{text}' is not a cell index"))
    };
    Ok(Coord::new(number(*row)?, number(*col)?))
}

fn grid_size(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(size) if (1..=MAX_GRID_SIZE).contains(&size) => Ok(size),
        _ => Err(format!("grid size must be between 1 and {MAX_GRID_SIZE}")),
    }
}

/// `y` or `yes`, any case.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
