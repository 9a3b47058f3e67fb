use anyhow::{Context, Result, bail};
use redline_engine::{
    Controller, EditorOptions, InitialValue, KeyCommand, MemoryHost, Outcome,
    SelectionPort, SentenceId, SurfacePort,
};
use std::io::Write;

/// One line of input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Markup,
    /// Place the caret at a linear offset
    Caret(usize),
    /// Place the caret inside a sentence (by position in the document)
    Focus { sentence: usize, offset: usize },
    Type(String),
    /// Delete chars before the caret
    Back(usize),
    Undo,
    Redo,
    Enter,
    Paste(String),
    History,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (name, rest) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));

        let command = match name {
            "show" | "s" => Self::Show,
            "markup" => Self::Markup,
            "caret" => Self::Caret(number(rest, "caret offset")?),
            "focus" => {
                let mut parts = rest.split_whitespace();
                let sentence = number(parts.next().unwrap_or(""), "sentence index")?;
                let offset = match parts.next() {
                    Some(offset) => number(offset, "offset")?,
                    None => 0,
                };
                Self::Focus { sentence, offset }
            }
            "type" | "t" => Self::Type(rest.to_string()),
            "back" | "b" => Self::Back(if rest.trim().is_empty() {
                1
            } else {
                number(rest, "count")?
            }),
            "undo" | "u" => Self::Undo,
            "redo" | "r" => Self::Redo,
            "enter" => Self::Enter,
            "paste" => Self::Paste(rest.to_string()),
            "history" | "h" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(command)
    }
}

fn number(text: &str, what: &str) -> Result<usize> {
    text.trim()
        .parse()
        .with_context(|| format!("expected a number for {what}, got '{}'", text.trim()))
}

const HELP: &str = "\
show              print the document, insertions as [+text+]
markup            print the surface markup
caret <n>         put the caret at offset n
focus <s> [n]     put the caret n chars into sentence s
type <text>       type at the caret
back [n]          delete n chars before the caret
undo | redo       replay history
enter             press Enter
paste <text>      paste (discarded)
history           list history entries
quit";

pub struct Session {
    editor: Controller<MemoryHost>,
}

impl Session {
    pub fn new(value: &InitialValue, options: EditorOptions) -> Result<Self> {
        let editor = Controller::mount(MemoryHost::new(), value, options)
            .context("failed to render initial value")?;
        Ok(Self { editor })
    }

    pub fn editor(&self) -> &Controller<MemoryHost> {
        &self.editor
    }

    /// Execute one command, writing its report to `out`. Returns false once
    /// the session should end.
    pub fn run(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        match command {
            Command::Show => self.show(out)?,
            Command::Markup => writeln!(out, "{}", self.editor.host().markup())?,
            Command::Caret(offset) => {
                self.editor.host_mut().restore_offset(offset);
                writeln!(out, "caret at {}", self.editor.host().capture_offset())?;
            }
            Command::Focus { sentence, offset } => {
                let id = self.sentence_id(sentence)?;
                self.editor.host_mut().place_caret_in_sentence(id, offset);
                writeln!(out, "caret at {}", self.editor.host().capture_offset())?;
            }
            Command::Type(text) => {
                self.editor.host_mut().type_text(&text)?;
                self.report_pump(out)?;
            }
            Command::Back(count) => {
                self.editor.host_mut().delete_backward(count)?;
                self.report_pump(out)?;
            }
            Command::Undo => self.press("z", true, out)?,
            Command::Redo => self.press("y", true, out)?,
            Command::Enter => self.press("Enter", false, out)?,
            Command::Paste(text) => {
                let response = self.editor.on_paste(&text);
                writeln!(out, "{}", prevented(response.prevent_default))?;
            }
            Command::History => self.history(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn sentence_id(&self, index: usize) -> Result<SentenceId> {
        match self.editor.document().sentences().nth(index) {
            Some(sentence) => Ok(sentence.id()),
            None => bail!("no sentence {index}"),
        }
    }

    /// Send a key press the way a surface would report it
    fn press(&mut self, key: &str, ctrl: bool, out: &mut impl Write) -> Result<()> {
        let command = KeyCommand::from_key(key, ctrl)
            .with_context(|| format!("no command bound to {key}"))?;
        let response = self.editor.on_key(command);
        match response.outcome {
            Some(outcome) => writeln!(out, "{}", describe(&outcome))?,
            None => writeln!(out, "{}", prevented(response.prevent_default))?,
        }
        // Consume the notification about our own write
        for outcome in self.editor.pump() {
            log::debug!("after {key}: {outcome:?}");
        }
        Ok(())
    }

    fn report_pump(&mut self, out: &mut impl Write) -> Result<()> {
        for outcome in self.editor.pump() {
            writeln!(out, "{}", describe(&outcome))?;
        }
        Ok(())
    }

    fn show(&self, out: &mut impl Write) -> Result<()> {
        let mut index = 0;
        for (number, paragraph) in self.editor.document().paragraphs().iter().enumerate() {
            writeln!(out, "¶{number}")?;
            for sentence in paragraph.sentences() {
                let text: String = if sentence.is_blank() {
                    "(empty)".to_string()
                } else {
                    sentence
                        .runs()
                        .iter()
                        .map(|run| {
                            if run.added {
                                format!("[+{}+]", run.text)
                            } else {
                                run.text.clone()
                            }
                        })
                        .collect()
                };
                let special = if sentence.is_special() { " *" } else { "" };
                writeln!(out, "  {index}: {text}{special}")?;
                index += 1;
            }
        }
        Ok(())
    }

    fn history(&self, out: &mut impl Write) -> Result<()> {
        let history = self.editor.history();
        let position = history.position();
        for (index, entry) in history.entries().enumerate() {
            let marker = if Some(index) == position { ">" } else { " " };
            writeln!(
                out,
                "{marker} {index}: {} bytes, caret {}",
                entry.surface().len(),
                entry.cursor()
            )?;
        }
        Ok(())
    }
}

fn prevented(prevent_default: bool) -> &'static str {
    if prevent_default {
        "blocked"
    } else {
        "allowed"
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Committed { position, .. } => format!("committed entry {position}"),
        Outcome::Suppressed => "ignored own render".to_string(),
        Outcome::Skipped(err) => format!("skipped: {err}"),
        Outcome::Replayed { position } => format!("now at entry {position}"),
        Outcome::Boundary => "nothing to replay".to_string(),
    }
}
