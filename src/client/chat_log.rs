// src/client/chat_log.rs
use std::fmt;

pub const LOADING_TEXT: &str = "Cooking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(usize);

/// Reply text, shown with a line break wherever it had a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReply {
    text: String,
}

impl RenderedReply {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// HTML with each newline turned into a `<br>`.
    pub fn to_html(&self) -> String {
        self.text
            .split('\n')
            .map(escape_html)
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

impl fmt::Display for RenderedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    Sending,
    Success(RenderedReply),
    Failure(String),
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnState::Sending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub reply: TurnState,
}

impl Turn {
    /// Markup for the reply bubble.
    pub fn reply_html(&self) -> String {
        match &self.reply {
            TurnState::Sending => format!(r#"<div class="text-sm">{LOADING_TEXT}</div>"#),
            TurnState::Success(reply) => {
                format!(r#"<p class="text-xs sm:text-sm">{}</p>"#, reply.to_html())
            }
            TurnState::Failure(msg) => format!(
                r#"<p class="text-xs sm:text-sm text-red-400">Error: {}</p>"#,
                escape_html(msg)
            ),
        }
    }
}

/// A started turn waiting for its reply. Holds no borrow of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub id: TurnId,
    pub message: String,
}

/// The outcome of a pending turn, ready to be applied to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledTurn {
    pub id: TurnId,
    pub outcome: Result<String, String>,
}

/// The turns shown in the chat box, oldest first.
#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    turns: Vec<Turn>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a turn for `input`. Blank input is ignored and returns `None`.
    pub fn begin(&mut self, input: &str) -> Option<TurnId> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.turns.push(Turn {
            user: text.to_string(),
            reply: TurnState::Sending,
        });
        Some(TurnId(self.turns.len() - 1))
    }

    /// Like [`ChatLog::begin`], also handing back the message to send.
    pub fn start(&mut self, input: &str) -> Option<PendingTurn> {
        let id = self.begin(input)?;
        Some(PendingTurn {
            id,
            message: self.turns[id.0].user.clone(),
        })
    }

    pub fn settle(&mut self, settled: SettledTurn) -> bool {
        self.resolve(settled.id, settled.outcome)
    }

    /// Settles a sending turn. False if the turn is unknown or already settled.
    pub fn resolve(&mut self, id: TurnId, outcome: Result<String, String>) -> bool {
        match self.turns.get_mut(id.0) {
            Some(turn) if !turn.reply.is_terminal() => {
                turn.reply = match outcome {
                    Ok(text) => TurnState::Success(RenderedReply::new(&text)),
                    Err(msg) => TurnState::Failure(msg),
                };
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.turns.get(id.0)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
