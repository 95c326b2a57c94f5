use std::collections::VecDeque;

use crate::canvas::CanvasBuffer;

/// Default number of undo steps kept before the oldest is evicted
pub const DEFAULT_MAX_UNDO_STATES: usize = 50;

/// The kind of edit a snapshot was taken before
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Stroke,
    Erase,
    Fill,
    Resize,
    Clear,
}

impl EditKind {
    pub fn label(self) -> &'static str {
        match self {
            EditKind::Stroke => "Brush Stroke",
            EditKind::Erase => "Erase",
            EditKind::Fill => "Bucket Fill",
            EditKind::Resize => "Resize Canvas",
            EditKind::Clear => "Clear Canvas",
        }
    }
}

/// Immutable copy of the canvas taken around an edit
#[derive(Debug, Clone)]
pub struct Snapshot {
    buffer: CanvasBuffer,
    kind: EditKind,
}

impl Snapshot {
    pub fn new(buffer: &CanvasBuffer, kind: EditKind) -> Self {
        Self {
            buffer: buffer.clone(),
            kind,
        }
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn buffer(&self) -> &CanvasBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }
}

/// Linear undo/redo over full canvas snapshots
#[derive(Debug)]
pub struct History {
    /// Snapshots that can be restored by undo, oldest first
    undo_stack: VecDeque<Snapshot>,
    /// Snapshots that can be restored by redo, most recent last
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_STATES)
    }
}

impl History {
    /// Creates an empty history keeping at most `capacity` undo steps
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot the buffer before it is mutated. Clears the redo stack.
    pub fn record_before_edit(&mut self, buffer: &CanvasBuffer, kind: EditKind) {
        self.push(Snapshot::new(buffer, kind));
    }

    /// Push a snapshot taken earlier. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("History full, dropping oldest {:?} snapshot", evicted.kind);
            }
        }
        self.redo_stack.clear();
    }

    /// Restore the most recent undo snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut CanvasBuffer) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = Snapshot {
            buffer: std::mem::replace(buffer, previous.buffer),
            kind: previous.kind,
        };
        self.redo_stack.push(current);
        true
    }

    /// Reapply the most recently undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self, buffer: &mut CanvasBuffer) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = Snapshot {
            buffer: std::mem::replace(buffer, next.buffer),
            kind: next.kind,
        };
        self.undo_stack.push_back(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &VecDeque<Snapshot> {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Snapshot] {
        &self.redo_stack
    }

    /// Drop all snapshots, e.g. after loading a new image
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
