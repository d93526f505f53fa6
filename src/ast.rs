use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandTree {
    Pipeline(Vec<Command>),
    And(Box<CommandTree>, Box<CommandTree>),
    Or(Box<CommandTree>, Box<CommandTree>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    In,
    Out,
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectKind::In => f.write_str("in"),
            RedirectKind::Out => f.write_str("out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    External,
    Cd,
    Pwd,
    Exit,
}

/// A single stage as written on the command line.
///
/// For external commands `args[0]` is the executable name; builtins only
/// carry their real arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub name: String,
    pub args: Vec<String>,
    pub redirect_in: Option<String>,
    pub redirect_out: Option<String>,
}

impl Command {
    pub fn new(kind: CommandKind, name: &str) -> Self {
        let args = match kind {
            CommandKind::External => vec![name.to_string()],
            _ => Vec::new(),
        };
        Command {
            kind,
            name: name.to_string(),
            args,
            redirect_in: None,
            redirect_out: None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.kind != CommandKind::External
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let skip = if self.is_builtin() { 0 } else { 1 };
        for arg in self.args.iter().skip(skip) {
            write!(f, " {}", arg)?;
        }
        if let Some(path) = &self.redirect_in {
            write!(f, " < {}", path)?;
        }
        if let Some(path) = &self.redirect_out {
            write!(f, " > {}", path)?;
        }
        Ok(())
    }
}

impl fmt::Display for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandTree::Pipeline(commands) => {
                for (i, cmd) in commands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", cmd)?;
                }
                Ok(())
            }
            CommandTree::And(lhs, rhs) => write!(f, "({} && {})", lhs, rhs),
            CommandTree::Or(lhs, rhs) => write!(f, "({} || {})", lhs, rhs),
        }
    }
}
