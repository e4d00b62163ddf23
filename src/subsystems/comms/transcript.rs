//! Client-side conversation view kept by chat front-ends.
//!
//! The server owns the persistent memory log; a transcript is the in-process
//! list a client renders. It never talks to the network itself.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Nova,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Nova => write!(f, "nova"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Message shown when the backend cannot be reached.
pub fn connection_error(operator: &str) -> String {
    format!("Desculpe, {operator}. Parece que estou com problemas para me conectar. Pode tentar novamente?")
}

#[derive(Debug, Default, Clone)]
pub struct ChatTranscript {
    messages: Vec<Message>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record what the user typed. Whitespace-only input is ignored and
    /// `None` is returned so the caller knows not to send anything.
    pub fn push_user(&mut self, text: &str) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(Message { sender: Sender::User, text: text.to_string() });
        self.messages.last()
    }

    pub fn push_nova(&mut self, text: impl Into<String>) -> &Message {
        self.messages.push(Message { sender: Sender::Nova, text: text.into() });
        &self.messages[self.messages.len() - 1]
    }

    /// Append the connection-failure reply on Nova's side.
    pub fn push_connection_error(&mut self, operator: &str) -> &Message {
        self.push_nova(connection_error(operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_ignored() {
        let mut t = ChatTranscript::new();
        assert!(t.push_user("").is_none());
        assert!(t.push_user("   \n\t").is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn user_text_is_trimmed() {
        let mut t = ChatTranscript::new();
        let m = t.push_user("  oi nova  ").unwrap();
        assert_eq!(m.text, "oi nova");
        assert_eq!(m.sender, Sender::User);
    }

    #[test]
    fn conversation_keeps_order() {
        let mut t = ChatTranscript::new();
        t.push_user("oi");
        t.push_nova("Oi, Kley!");
        t.push_user("tudo bem?");
        let senders: Vec<_> = t.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Nova, Sender::User]);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn connection_error_names_operator() {
        let mut t = ChatTranscript::new();
        t.push_user("oi");
        let m = t.push_connection_error("Kley");
        assert_eq!(m.sender, Sender::Nova);
        assert_eq!(
            m.text,
            "Desculpe, Kley. Parece que estou com problemas para me conectar. Pode tentar novamente?"
        );
    }

    #[test]
    fn sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Nova.to_string(), "nova");
    }
}
