//! Ordering of the render passes for one surface.

use pixelconfig::StructuralKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// The dithered pattern itself.
    Base,
    /// Trail-driven UV displacement.
    Liquid,
    /// Film grain over the finished frame.
    Noise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub kind: PassKind,
    pub render_to_screen: bool,
}

/// Ordered pass list. Exactly one pass, the last, writes to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassChain {
    passes: Vec<Pass>,
}

impl PassChain {
    pub fn base_only() -> Self {
        Self {
            passes: vec![Pass {
                kind: PassKind::Base,
                render_to_screen: true,
            }],
        }
    }

    /// Chain for a configuration: base, then liquid when enabled, grain last.
    pub fn for_key(key: &StructuralKey) -> Self {
        let mut chain = Self::base_only();
        if key.liquid {
            chain.push(PassKind::Liquid);
        }
        if key.noise {
            chain.push(PassKind::Noise);
        }
        chain
    }

    /// Appends a terminal pass, demoting whatever wrote to the screen before.
    pub fn push(&mut self, kind: PassKind) {
        for pass in &mut self.passes {
            pass.render_to_screen = false;
        }
        self.passes.push(Pass {
            kind,
            render_to_screen: true,
        });
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Every pass after the base pass, in order.
    pub fn post_passes(&self) -> &[Pass] {
        &self.passes[1..]
    }

    /// Whether the base pass renders offscreen first.
    pub fn needs_compositor(&self) -> bool {
        self.passes.len() > 1
    }

    pub fn terminal(&self) -> PassKind {
        self.passes
            .last()
            .map(|pass| pass.kind)
            .unwrap_or(PassKind::Base)
    }
}

impl Default for PassChain {
    fn default() -> Self {
        Self::base_only()
    }
}
