//! The call stack of one guest thread.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{EngineConfig, GuestError, Value};

/// One activation: a function name and a stack of variable scopes.
#[derive(Debug, Clone)]
pub struct Frame {
    function: String,
    scopes: Vec<FxHashMap<String, Value>>,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            scopes: vec![FxHashMap::default()],
        }
    }

    /// The function this frame belongs to.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Bind `name` in the innermost scope, replacing any existing binding there.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// Look `name` up from the innermost scope outwards.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Leave the innermost scope. The outermost scope is never removed.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }
}

/// The execution context of one guest thread.
///
/// The bottom frame belongs to the thread itself and is never popped.
#[derive(Debug)]
pub struct ThreadRuntime {
    config: EngineConfig,
    frames: Vec<Frame>,
}

impl ThreadRuntime {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            frames: vec![Frame::new("<main>")],
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of frames above the thread's own frame.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Push a frame for `function`.
    pub fn push_frame(&mut self, function: impl Into<String>) -> Result<(), GuestError> {
        let depth = self.depth() + 1;
        if depth > self.config.max_call_depth {
            return Err(GuestError::StackOverflow {
                depth,
                limit: self.config.max_call_depth,
            });
        }
        let frame = Frame::new(function);
        trace!(function = frame.function(), depth, "push frame");
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the innermost frame. Returns `None` at the thread's own frame.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            let frame = self.frames.pop();
            trace!(depth = self.depth(), "pop frame");
            frame
        } else {
            None
        }
    }

    pub fn current_frame(&self) -> &Frame {
        // The thread's own frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_frame_mut(&mut self) -> &mut Frame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// Bind `name` in the current scope of the current frame.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.current_frame_mut().bind(name, value);
    }

    /// Look `name` up in the current frame.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.current_frame().lookup(name)
    }

    pub fn enter_scope(&mut self) {
        self.current_frame_mut().enter_scope();
    }

    pub fn exit_scope(&mut self) {
        self.current_frame_mut().exit_scope();
    }
}

impl Default for ThreadRuntime {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
