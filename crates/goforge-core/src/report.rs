//! Human-readable narration of an operation's result.
//!
//! Operations never print. Each returns a typed report; the CLI prints its
//! narration line by line and the HTTP API returns the same lines joined
//! alongside the serialized report.

pub trait Narrate {
    fn narrate(&self) -> Vec<String>;

    fn narration(&self) -> String {
        let mut out = self.narrate().join("\n");
        out.push('\n');
        out
    }
}
