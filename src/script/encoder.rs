//! Streaming script encoder and its sentinel state machine

use std::io::Write;

use super::errors::{ScriptError, ScriptResult};
use super::instruction::{DatasetCommand, Mutation};

/// The positional disambiguation state.
///
/// The backend parses the script array without per-element type tags, so a
/// run of row payloads must be closed by a `null` sentinel before the next
/// instruction; otherwise a row-option header or add-column instruction
/// would be read as just another row object. Kept as its own type so the
/// transition rules are testable away from the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// Between runs; instructions are emitted bare and rows are invalid
    Outside,
    /// Inside a run of rows (possibly empty) opened by a row-option change
    InRowRun,
}

impl RunState {
    /// Leaves any open row run for an instruction element. Returns whether
    /// a sentinel must be written first.
    fn close_for_instruction(&mut self) -> bool {
        let sentinel = *self == RunState::InRowRun;
        *self = RunState::Outside;
        sentinel
    }

    /// Opens a row run (zero rows emitted yet).
    fn open_row_run(&mut self) {
        *self = RunState::InRowRun;
    }

    fn row_allowed(&self) -> bool {
        *self == RunState::InRowRun
    }
}

/// Incremental encoder for one mutation script.
///
/// Construction writes the array opener and header element; [`emit`]
/// appends elements one at a time; [`finish`] closes the array. The caller
/// never holds more than one encoded element in memory.
///
/// [`emit`]: ScriptEncoder::emit
/// [`finish`]: ScriptEncoder::finish
pub struct ScriptEncoder<W: Write> {
    out: W,
    state: RunState,
}

impl<W: Write> ScriptEncoder<W> {
    /// Starts a script: writes `[` and the dataset-command header.
    pub fn new(mut out: W, actor: &str, command: &DatasetCommand) -> ScriptResult<Self> {
        out.write_all(b"[")?;
        serde_json::to_writer(&mut out, &command.header_json(actor))?;
        Ok(Self {
            out,
            state: RunState::Outside,
        })
    }

    /// Appends one element, inserting the sentinel where the positional
    /// parser needs it.
    ///
    /// Emitting a row while no row run is open is a protocol-sequencing
    /// error: the backend would have no option state to apply it under.
    pub fn emit(&mut self, element: &Mutation) -> ScriptResult<()> {
        if element.is_row() {
            if !self.state.row_allowed() {
                return Err(ScriptError::RowOutsideRun);
            }
            return self.write_element(element);
        }

        if self.state.close_for_instruction() {
            self.out.write_all(b",null")?;
        }
        self.write_element(element)?;
        if let Mutation::RowOptions(_) = element {
            self.state.open_row_run();
        }
        Ok(())
    }

    /// Closes the array. No trailing sentinel regardless of state.
    pub fn finish(mut self) -> ScriptResult<W> {
        self.out.write_all(b"]")?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_element(&mut self, element: &Mutation) -> ScriptResult<()> {
        self.out.write_all(b",")?;
        serde_json::to_writer(&mut self.out, &element.wire_json())?;
        Ok(())
    }
}

/// Encodes a complete element sequence in one call.
pub fn encode_script<W, I>(
    out: W,
    actor: &str,
    command: &DatasetCommand,
    elements: I,
) -> ScriptResult<W>
where
    W: Write,
    I: IntoIterator<Item = Mutation>,
{
    let mut encoder = ScriptEncoder::new(out, actor, command)?;
    for element in elements {
        encoder.emit(&element)?;
    }
    encoder.finish()
}
