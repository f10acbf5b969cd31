use std::{
    io::{stdin, stdout, Write},
    path::Path,
};

use anyhow::Context;
use cli_common::ParseError;
use parser::ast::{Program, Statement};
use tabled::Tabled;

pub struct Repl {
    show_filters: bool,
}

#[derive(Debug)]
pub enum Result {
    Exit,
    Help,
    ToggleFilters,
    NoInput,
    UnrecognisedInput,
    Ok(CommandResult),
}

#[derive(Debug)]
pub enum CommandResult {
    ParseError(ParseError),
    Ok(Vec<Statement>),
}

#[derive(Tabled)]
struct FilterRow {
    attribute: String,
    operator: String,
    values: String,
}

impl FilterRow {
    fn rows(statement: &Statement) -> Vec<FilterRow> {
        statement
            .filters()
            .iter()
            .map(|expr| FilterRow {
                attribute: expr.attribute().to_string(),
                operator: expr.operator().to_string().trim().to_string(),
                values: expr.values().join(", "),
            })
            .collect()
    }
}

impl Repl {
    pub fn new(show_filters: bool) -> Self {
        Repl { show_filters }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            Repl::print_prompt()?;

            let mut buf = String::new();
            if stdin().read_line(&mut buf)? == 0 {
                println!("Goodbye.");
                return Ok(());
            }

            match self.handle_repl_command(&buf) {
                Result::Ok(command_result) => {
                    self.print_command_result(command_result);
                }
                Result::Help => {
                    println!("Statements: CREATE KEYSPACE, DROP KEYSPACE, SELECT, UPSERT, DELETE.");
                    println!("Meta commands: .filters (toggle filter table), .help, .exit");
                }
                Result::ToggleFilters => {
                    self.show_filters = !self.show_filters;
                    let state = if self.show_filters { "on" } else { "off" };
                    println!("Filter table {state}.");
                }
                Result::UnrecognisedInput => {
                    println!("Error! Command not recognised.");
                }
                Result::Exit => {
                    println!("Goodbye.");
                    return Ok(());
                }
                Result::NoInput => {}
            }
        }
    }

    pub fn eval_command(&self, input: &str) -> CommandResult {
        match parser::parse_program(input) {
            Ok(Program::Statements(statements)) => CommandResult::Ok(statements),
            Ok(Program::Empty) => CommandResult::Ok(vec![]),
            Err(e) => CommandResult::ParseError(e),
        }
    }

    pub fn eval_file(&self, file: &Path) -> anyhow::Result<CommandResult> {
        let file_content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to open {}", file.display()))?;

        Ok(self.eval_command(&file_content))
    }

    /// Print a command's outcome. Returns false when it failed.
    pub fn print_command_result(&self, result: CommandResult) -> bool {
        match result {
            CommandResult::ParseError(err) => {
                println!("Syntax Error: {err}");
                false
            }
            CommandResult::Ok(statements) => {
                if statements.is_empty() {
                    println!("No statements");
                }

                for statement in statements {
                    println!("{}", statement.render());

                    if self.show_filters && !statement.filters().is_empty() {
                        let table = tabled::Table::new(FilterRow::rows(&statement)).to_string();
                        println!("{table}");
                    }
                }

                true
            }
        }
    }

    /// Handle user input via REPL. This will either
    /// eval a command or short-circuit for a meta command.
    fn handle_repl_command(&self, buf: &str) -> Result {
        let fmt_buf = buf.trim();

        if fmt_buf.is_empty() {
            Result::NoInput
        } else if Repl::is_meta_command(fmt_buf) {
            Repl::handle_meta_command(fmt_buf)
        } else {
            log::debug!("evaluating {fmt_buf:?}");
            Result::Ok(self.eval_command(fmt_buf))
        }
    }

    fn is_meta_command(buf: &str) -> bool {
        buf.starts_with('.')
    }

    fn handle_meta_command(buf: &str) -> Result {
        match buf.to_lowercase().as_ref() {
            ".exit" | ".quit" | ".close" => Result::Exit,
            ".help" | ".h" | ".?" => Result::Help,
            ".filters" => Result::ToggleFilters,
            _ => Result::UnrecognisedInput,
        }
    }

    fn print_prompt() -> std::io::Result<()> {
        print!("> ");
        stdout().flush()
    }
}
