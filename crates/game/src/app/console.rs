use std::collections::HashMap;

use engine::Key;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayCommand {
    KeyDown { key: Key },
    KeyUp { key: Key },
    Press { key: Key },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Tick { ms: f64 },
    Confirm,
    State,
    Inventory,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LocalAction {
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedCommand {
    Local(LocalAction),
    Play(PlayCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommandParseError {
    reason: String,
    usage: String,
}

impl CommandParseError {
    fn new(reason: impl Into<String>, usage: &str) -> Self {
        Self {
            reason: reason.into(),
            usage: usage.to_string(),
        }
    }
}

type ParseFn = fn(&[String]) -> Result<ParsedCommand, CommandParseError>;

struct CommandSpec {
    name: &'static str,
    help: &'static str,
    arg_schema: &'static str,
    parse: ParseFn,
}

/// Line commands accepted by the headless driver, looked up case-insensitively.
pub(crate) struct CommandRegistry {
    specs: Vec<CommandSpec>,
    lookup_by_lower_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self {
            specs: Vec::new(),
            lookup_by_lower_name: HashMap::new(),
        };
        registry.register("help", "List commands", "", parse_help);
        registry.register("down", "Hold a key", "<key>", parse_key_down);
        registry.register("up", "Release a key", "<key>", parse_key_up);
        registry.register(
            "press",
            "Hold an arrow for one input tick",
            "<left|right|up|down>",
            parse_press,
        );
        registry.register("pointer-down", "Touch at a point", "<x:f32> <y:f32>", parse_pointer_down);
        registry.register("pointer-move", "Drag to a point", "<x:f32> <y:f32>", parse_pointer_move);
        registry.register("pointer-up", "Lift the pointer", "", parse_pointer_up);
        registry.register("tick", "Advance the clock", "<ms:f64>", parse_tick);
        registry.register("confirm", "Confirm the showing dialog", "", parse_confirm);
        registry.register("state", "Print the session state as JSON", "", parse_state);
        registry.register("inventory", "Print held items and their counts", "", parse_inventory);
        registry.register("quit", "End the session", "", parse_quit);
        registry
    }

    fn register(
        &mut self,
        name: &'static str,
        help: &'static str,
        arg_schema: &'static str,
        parse: ParseFn,
    ) {
        self.lookup_by_lower_name
            .insert(name.to_ascii_lowercase(), self.specs.len());
        self.specs.push(CommandSpec {
            name,
            help,
            arg_schema,
            parse,
        });
    }

    /// `Ok(None)` for blank lines. Errors are already formatted for display.
    pub(crate) fn parse_line(&self, raw_line: &str) -> Result<Option<ParsedCommand>, String> {
        let tokens = raw_line.split_whitespace().collect::<Vec<_>>();
        let Some((command_name, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let Some(spec) = self
            .lookup_by_lower_name
            .get(&command_name.to_ascii_lowercase())
            .and_then(|index| self.specs.get(*index))
        else {
            return Err(format!("error: unknown command '{command_name}'. try: help"));
        };
        let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
        (spec.parse)(&args)
            .map(Some)
            .map_err(|error| format!("error: {}. usage: {}", error.reason, error.usage))
    }

    pub(crate) fn help_lines(&self) -> Vec<String> {
        self.specs
            .iter()
            .map(|spec| {
                if spec.arg_schema.is_empty() {
                    format!("{} - {}", spec.name, spec.help)
                } else {
                    format!("{} {} - {}", spec.name, spec.arg_schema, spec.help)
                }
            })
            .collect()
    }
}

fn require_no_args(args: &[String], usage: &str) -> Result<(), CommandParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandParseError::new(
            format!("expected no arguments, got {}", args.len()),
            usage,
        ))
    }
}

fn single_arg<'a>(args: &'a [String], name: &str, usage: &str) -> Result<&'a str, CommandParseError> {
    match args {
        [value] => Ok(value.as_str()),
        [] => Err(CommandParseError::new(
            format!("missing required argument <{name}>"),
            usage,
        )),
        _ => Err(CommandParseError::new(
            format!("expected 1 argument, got {}", args.len()),
            usage,
        )),
    }
}

fn parse_key(raw: &str) -> Key {
    match raw.to_ascii_lowercase().as_str() {
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        _ => Key::from_identifier(raw),
    }
}

fn parse_point(args: &[String], usage: &str) -> Result<(f32, f32), CommandParseError> {
    let [x, y] = args else {
        return Err(CommandParseError::new(
            format!("expected 2 arguments, got {}", args.len()),
            usage,
        ));
    };
    let parse = |raw: &str| {
        raw.parse::<f32>().map_err(|_| {
            CommandParseError::new(format!("invalid coordinate '{raw}' (expected f32)"), usage)
        })
    };
    Ok((parse(x.as_str())?, parse(y.as_str())?))
}

fn parse_help(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "help")?;
    Ok(ParsedCommand::Local(LocalAction::Help))
}

fn parse_quit(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "quit")?;
    Ok(ParsedCommand::Local(LocalAction::Quit))
}

fn parse_key_down(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let key = single_arg(args, "key", "down <key>")?;
    Ok(ParsedCommand::Play(PlayCommand::KeyDown { key: parse_key(key) }))
}

fn parse_key_up(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let key = single_arg(args, "key", "up <key>")?;
    Ok(ParsedCommand::Play(PlayCommand::KeyUp { key: parse_key(key) }))
}

fn parse_press(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "press <left|right|up|down>";
    let raw = single_arg(args, "direction", USAGE)?;
    let key = parse_key(raw);
    if !key.is_arrow() {
        return Err(CommandParseError::new(
            format!("invalid direction '{raw}'"),
            USAGE,
        ));
    }
    Ok(ParsedCommand::Play(PlayCommand::Press { key }))
}

fn parse_pointer_down(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let (x, y) = parse_point(args, "pointer-down <x> <y>")?;
    Ok(ParsedCommand::Play(PlayCommand::PointerDown { x, y }))
}

fn parse_pointer_move(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let (x, y) = parse_point(args, "pointer-move <x> <y>")?;
    Ok(ParsedCommand::Play(PlayCommand::PointerMove { x, y }))
}

fn parse_pointer_up(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "pointer-up")?;
    Ok(ParsedCommand::Play(PlayCommand::PointerUp))
}

fn parse_tick(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "tick <ms>";
    let raw = single_arg(args, "ms", USAGE)?;
    let ms = raw
        .parse::<f64>()
        .ok()
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .ok_or_else(|| {
            CommandParseError::new(
                format!("invalid duration '{raw}' (expected non-negative f64)"),
                USAGE,
            )
        })?;
    Ok(ParsedCommand::Play(PlayCommand::Tick { ms }))
}

fn parse_confirm(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "confirm")?;
    Ok(ParsedCommand::Play(PlayCommand::Confirm))
}

fn parse_state(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "state")?;
    Ok(ParsedCommand::Play(PlayCommand::State))
}

fn parse_inventory(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "inventory")?;
    Ok(ParsedCommand::Play(PlayCommand::Inventory))
}
