/// AI chat transcript.
///
/// The transcript is an ordered list of message records. A sent message
/// appends the user's text and a pending "thinking" placeholder; the reply
/// resolves that exact placeholder by id, whatever order replies arrive in.
use super::Dashboard;
use crate::api::{ApiResult, Backend};

pub const THINKING: &str = "Thinking...";
pub const AGENT_UNREACHABLE: &str = "Error: Could not reach AI agent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub text: String,
    /// Placeholder still waiting for its reply.
    pub pending: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    /// Contents of the input box.
    pub input: String,
    pub messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatPanel {
    fn push(&mut self, role: Role, text: &str, pending: bool) -> u64 {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            text: text.to_string(),
            pending,
        });
        self.next_id
    }

    /// Index of the placeholder `id` while it still awaits its reply.
    fn pending_position(&self, id: u64) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id && m.pending)
    }

    /// Number of placeholders still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }
}

/// An outstanding chat request: the text sent and the placeholder awaiting
/// the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTicket {
    pub placeholder: u64,
    pub message: String,
}

impl<B: Backend> Dashboard<B> {
    pub fn set_chat_input(&mut self, text: impl Into<String>) {
        self.state.chat.input = text.into();
    }

    /// Send the input box contents to the AI agent and show the reply.
    ///
    /// Whitespace-only input does nothing.
    pub fn send_message(&mut self) {
        let Some(ticket) = self.begin_message() else {
            return;
        };
        let result = self.backend.rag_query(&ticket.message);
        self.complete_message(&ticket, result);
    }

    /// Key handler for the input box: Enter sends.
    pub fn handle_key(&mut self, key: &str) {
        if key == "Enter" {
            self.send_message();
        }
    }

    /// First half of [`send_message`](Self::send_message): append the user
    /// message and a placeholder, clear the input, and hand back the ticket
    /// for the request to issue. `None` for empty input.
    pub fn begin_message(&mut self) -> Option<ChatTicket> {
        let message = self.state.chat.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        let chat = &mut self.state.chat;
        chat.push(Role::User, &message, false);
        chat.input.clear();
        let placeholder = chat.push(Role::Ai, THINKING, true);

        Some(ChatTicket {
            placeholder,
            message,
        })
    }

    /// Second half of [`send_message`](Self::send_message).
    ///
    /// On success the placeholder is removed and the reply appended to the
    /// transcript; on failure the placeholder's text becomes an error in
    /// place. Each ticket resolves once: returns `false` if its placeholder
    /// is gone or already resolved.
    pub fn complete_message(&mut self, ticket: &ChatTicket, result: ApiResult<String>) -> bool {
        let Some(pos) = self.state.chat.pending_position(ticket.placeholder) else {
            return false;
        };

        match result {
            Ok(reply) => {
                self.state.chat.messages.remove(pos);
                self.state.chat.push(Role::Ai, &reply, false);
            }
            Err(err) => {
                self.log_failure("send_message", &err);
                let placeholder = &mut self.state.chat.messages[pos];
                placeholder.text = AGENT_UNREACHABLE.to_string();
                placeholder.pending = false;
            }
        }
        true
    }
}
