use crate::calc::{DeductionKind, LengthUnit, Plan, RoomReport, RoomShape};

/// Where a chat is inside a multi-step flow.
///
/// Each variant carries exactly the data collected so far, in meters where a
/// length is involved. Lengths entered in centimeters or millimeters are
/// converted as soon as they are accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum State {
    #[default]
    Idle,
    QuickArea,
    RoomShape,
    RoomUnit {
        shape: RoomShape,
    },
    RoomFirstDimension {
        shape: RoomShape,
        unit: LengthUnit,
    },
    RoomSecondDimension {
        shape: RoomShape,
        unit: LengthUnit,
        length: f64,
    },
    RoomHeight {
        shape: RoomShape,
        unit: LengthUnit,
        plan: Plan,
    },
    DeductionPrompt {
        report: RoomReport,
    },
    DeductionLength {
        report: RoomReport,
        kind: DeductionKind,
    },
    DeductionWidth {
        report: RoomReport,
        kind: DeductionKind,
        length: f64,
    },
    Budget,
    CostMaterial,
    CostQuantity {
        material: String,
    },
    CostDiscount {
        material: String,
        quantity: f64,
    },
    ListName,
    ItemSelection {
        list: String,
    },
    ItemQuantity {
        list: String,
        item: String,
    },
    NoteText,
    AiQuestion,
}

impl State {
    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::QuickArea => "quick_area",
            State::RoomShape => "room_shape",
            State::RoomUnit { .. } => "room_unit",
            State::RoomFirstDimension { .. } => "room_dimension_1",
            State::RoomSecondDimension { .. } => "room_dimension_2",
            State::RoomHeight { .. } => "room_height",
            State::DeductionPrompt { .. } => "deduction_prompt",
            State::DeductionLength { .. } => "deduction_length",
            State::DeductionWidth { .. } => "deduction_width",
            State::Budget => "budget",
            State::CostMaterial => "cost_material",
            State::CostQuantity { .. } => "cost_quantity",
            State::CostDiscount { .. } => "cost_discount",
            State::ListName => "list_name",
            State::ItemSelection { .. } => "item_selection",
            State::ItemQuantity { .. } => "item_quantity",
            State::NoteText => "note_text",
            State::AiQuestion => "ai_question",
        }
    }
}
