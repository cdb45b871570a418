use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Decorations: u8 {
        /// More content remains for a following page.
        const HAVE_MORE_DATA = 1 << 0;
        /// The current content may be drawn again unchanged.
        const REUSABLE = 1 << 1;
        const ALL_DATA_CONSUMED = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    New,
    Waiting,
    NeedsLayout,
    Ready,
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameState {
    #[default]
    New,
    Waiting,
    NeedsLayout,
    Ready,
    Drawn(Decorations),
}

impl FrameState {
    pub fn phase(&self) -> Phase {
        match self {
            FrameState::New => Phase::New,
            FrameState::Waiting => Phase::Waiting,
            FrameState::NeedsLayout => Phase::NeedsLayout,
            FrameState::Ready => Phase::Ready,
            FrameState::Drawn(_) => Phase::Drawn,
        }
    }

    pub fn decorations(&self) -> Decorations {
        match self {
            FrameState::Drawn(decorations) => *decorations,
            _ => Decorations::empty(),
        }
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self, FrameState::Drawn(_))
    }

    pub fn has_more_data(&self) -> bool {
        self.decorations().contains(Decorations::HAVE_MORE_DATA)
    }

    pub fn is_reusable(&self) -> bool {
        self.decorations().contains(Decorations::REUSABLE)
    }

    /// Between `measure` and `draw`: cached sizes or regions are live.
    pub fn is_laying_out(&self) -> bool {
        matches!(self, FrameState::NeedsLayout | FrameState::Ready)
    }

    fn from_phase(phase: Phase) -> FrameState {
        match phase {
            Phase::New => FrameState::New,
            Phase::Waiting => FrameState::Waiting,
            Phase::NeedsLayout => FrameState::NeedsLayout,
            Phase::Ready => FrameState::Ready,
            Phase::Drawn => FrameState::Drawn(Decorations::empty()),
        }
    }
}

/// Combine child states into a composite state.
///
/// Until every child is drawn the result is the furthest child phase. Once
/// all are drawn, decorations merge: `REUSABLE` if any child is reusable,
/// then `HAVE_MORE_DATA` if any child has more, otherwise
/// `ALL_DATA_CONSUMED` if any child reports it. Returns `None` for no
/// children.
pub fn aggregate<I>(states: I) -> Option<FrameState>
where
    I: IntoIterator<Item = FrameState>,
{
    let mut furthest: Option<Phase> = None;
    let mut all_drawn = true;
    let mut merged = Decorations::empty();
    for state in states {
        let phase = state.phase();
        furthest = Some(furthest.map_or(phase, |seen| seen.max(phase)));
        all_drawn &= state.is_drawn();
        merged |= state.decorations();
    }
    let furthest = furthest?;
    if !all_drawn {
        return Some(FrameState::from_phase(furthest));
    }
    let mut decorations = merged & Decorations::REUSABLE;
    if merged.contains(Decorations::HAVE_MORE_DATA) {
        decorations |= Decorations::HAVE_MORE_DATA;
    } else if merged.contains(Decorations::ALL_DATA_CONSUMED) {
        decorations |= Decorations::ALL_DATA_CONSUMED;
    }
    Some(FrameState::Drawn(decorations))
}
