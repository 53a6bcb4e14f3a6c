//! One side of the workspace and its transcript.

use std::cell::Cell;
use std::rc::Rc;

use crate::workspace::gate::SendRejection;
use crate::workspace::uploads::AttachmentBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneSide {
    A,
    B,
}

impl PaneSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Source of session ids shared by every pane of one controller, so a pane
/// created after another was destroyed never reuses its id.
#[derive(Debug, Clone, Default)]
pub struct SessionIds {
    next: Rc<Cell<u64>>,
}

impl SessionIds {
    pub fn next(&self) -> u64 {
        let id = self.next.get() + 1;
        self.next.set(id);
        id
    }
}

/// Identifies one in-flight generation: which pane, which logical session of
/// that pane, and which send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationTicket {
    pub side: PaneSide,
    pub session: u64,
    pub seq: u64,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub media: Option<String>,
    pub is_loading: bool,
    attachments: Option<Rc<AttachmentBundle>>,
}

impl Message {
    pub fn user(text: impl Into<String>, attachments: Option<Rc<AttachmentBundle>>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            media: None,
            is_loading: false,
            attachments,
        }
    }

    pub fn assistant(text: impl Into<String>, media: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            media,
            is_loading: false,
            attachments: None,
        }
    }

    fn loading() -> Self {
        Self {
            role: Role::Assistant,
            text: String::new(),
            media: None,
            is_loading: true,
            attachments: None,
        }
    }

    pub fn attached_preview_uris(&self) -> Vec<String> {
        self.attachments
            .as_ref()
            .map(|bundle| bundle.preview_uris())
            .unwrap_or_default()
    }

    pub fn attachments(&self) -> Option<&AttachmentBundle> {
        self.attachments.as_deref()
    }
}

#[derive(Debug)]
pub struct PaneState {
    side: PaneSide,
    session: u64,
    transcript: Vec<Message>,
    pending: Option<u64>,
    session_ids: SessionIds,
}

impl PaneState {
    pub fn new(side: PaneSide, session_ids: SessionIds) -> Self {
        Self {
            side,
            session: session_ids.next(),
            transcript: Vec::new(),
            pending: None,
            session_ids,
        }
    }

    pub fn side(&self) -> PaneSide {
        self.side
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn welcome_visible(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn append_user_message(
        &mut self,
        text: impl Into<String>,
        attachments: Option<Rc<AttachmentBundle>>,
    ) {
        self.transcript.push(Message::user(text, attachments));
    }

    pub fn append_loading_placeholder(
        &mut self,
        seq: u64,
    ) -> Result<GenerationTicket, SendRejection> {
        if self.pending.is_some() {
            return Err(SendRejection::GenerationPending { side: self.side });
        }
        self.transcript.push(Message::loading());
        self.pending = Some(seq);
        Ok(self.ticket(seq))
    }

    /// Swaps the pending placeholder for exactly one assistant message at the
    /// same position. Returns false when the ticket no longer matches.
    pub fn replace_loading_with_assistant(
        &mut self,
        ticket: GenerationTicket,
        text: impl Into<String>,
        media: Option<String>,
    ) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        let Some(position) = self.transcript.iter().rposition(|m| m.is_loading) else {
            return false;
        };
        self.transcript[position] = Message::assistant(text, media);
        self.pending = None;
        true
    }

    /// Drops the pending placeholder without a reply.
    pub fn abandon_loading(&mut self, ticket: GenerationTicket) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        if let Some(position) = self.transcript.iter().rposition(|m| m.is_loading) {
            self.transcript.remove(position);
        }
        self.pending = None;
        true
    }

    pub fn owns(&self, ticket: GenerationTicket) -> bool {
        ticket.side == self.side && ticket.session == self.session && self.pending == Some(ticket.seq)
    }

    /// Empties the transcript and starts a new logical session. Attachments
    /// held only by this pane are released here.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.pending = None;
        self.session = self.session_ids.next();
    }

    fn ticket(&self, seq: u64) -> GenerationTicket {
        GenerationTicket {
            side: self.side,
            session: self.session,
            seq,
        }
    }
}
