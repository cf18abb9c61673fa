//! Area, volume and material cost arithmetic.
//!
//! Everything here is pure. Dimensions are validated by [`positive`] before
//! they reach the formulas, and all results are rounded the way they are
//! shown to the user.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text_utils::InputError;

/// Default cutting allowance for area-based materials.
pub const DEFAULT_WASTE_PERCENT: f64 = 5.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Reject zero, negative and non-finite dimensions.
pub fn positive(value: f64) -> Result<f64, InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InputError::NotPositive)
    }
}

/// Reject results that overflowed while multiplying valid inputs.
pub fn finite(value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::OutOfRange)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Meter,
    Centimeter,
    Millimeter,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 3] = [
        LengthUnit::Meter,
        LengthUnit::Centimeter,
        LengthUnit::Millimeter,
    ];

    pub fn factor(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Millimeter => 0.001,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.factor()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meter => "м",
            LengthUnit::Centimeter => "см",
            LengthUnit::Millimeter => "мм",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Meter => "Метры",
            LengthUnit::Centimeter => "Сантиметры",
            LengthUnit::Millimeter => "Миллиметры",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Millimeter => "mm",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomShape {
    Rectangular,
    Square,
    Circular,
}

impl RoomShape {
    pub const ALL: [RoomShape; 3] = [RoomShape::Rectangular, RoomShape::Square, RoomShape::Circular];

    pub fn name(self) -> &'static str {
        match self {
            RoomShape::Rectangular => "Прямоугольная",
            RoomShape::Square => "Квадратная",
            RoomShape::Circular => "Круглая",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoomShape::Rectangular => "▭ Прямоугольная",
            RoomShape::Square => "◻ Квадратная",
            RoomShape::Circular => "◯ Круглая",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RoomShape::Rectangular => "rect",
            RoomShape::Square => "square",
            RoomShape::Circular => "circle",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// Floor plan of a room in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Plan {
    Rectangle { length: f64, width: f64 },
    Circle { diameter: f64 },
}

impl Plan {
    pub fn rectangle(length: f64, width: f64) -> Result<Self, InputError> {
        Plan::Rectangle {
            length: positive(length)?,
            width: positive(width)?,
        }
        .checked()
    }

    pub fn square(side: f64) -> Result<Self, InputError> {
        Self::rectangle(side, side)
    }

    pub fn circle(diameter: f64) -> Result<Self, InputError> {
        Plan::Circle {
            diameter: positive(diameter)?,
        }
        .checked()
    }

    fn checked(self) -> Result<Self, InputError> {
        finite(self.floor_area())?;
        finite(self.perimeter())?;
        Ok(self)
    }

    pub fn floor_area(&self) -> f64 {
        match *self {
            Plan::Rectangle { length, width } => length * width,
            Plan::Circle { diameter } => PI * (diameter / 2.0).powi(2),
        }
    }

    pub fn perimeter(&self) -> f64 {
        match *self {
            Plan::Rectangle { length, width } => 2.0 * (length + width),
            Plan::Circle { diameter } => PI * diameter,
        }
    }

    pub fn wall_area(&self, height: f64) -> f64 {
        self.perimeter() * height
    }

    pub fn volume(&self, height: f64) -> f64 {
        self.floor_area() * height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionKind {
    Window,
    Door,
    Other,
}

impl DeductionKind {
    pub const ALL: [DeductionKind; 3] = [DeductionKind::Window, DeductionKind::Door, DeductionKind::Other];

    pub fn name(self) -> &'static str {
        match self {
            DeductionKind::Window => "Окно",
            DeductionKind::Door => "Дверь",
            DeductionKind::Other => "Проём",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeductionKind::Window => "🪟 Окно",
            DeductionKind::Door => "🚪 Дверь",
            DeductionKind::Other => "▫️ Другое",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DeductionKind::Window => "window",
            DeductionKind::Door => "door",
            DeductionKind::Other => "other",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

/// An opening subtracted from the gross wall area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub kind: DeductionKind,
    pub length: f64,
    pub width: f64,
    pub area: f64,
}

impl Deduction {
    pub fn new(kind: DeductionKind, length: f64, width: f64) -> Result<Self, InputError> {
        let length = positive(length)?;
        let width = positive(width)?;
        Ok(Self {
            kind,
            length,
            width,
            area: round2(finite(length * width)?),
        })
    }
}

/// Result of the room wizard, all values in meters and already rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomReport {
    pub shape: RoomShape,
    pub unit: LengthUnit,
    pub plan: Plan,
    pub height: Option<f64>,
    pub floor_area: f64,
    pub perimeter: f64,
    pub wall_area: Option<f64>,
    pub volume: Option<f64>,
    pub deductions: Vec<Deduction>,
}

impl RoomReport {
    pub fn new(
        shape: RoomShape,
        unit: LengthUnit,
        plan: Plan,
        height: Option<f64>,
    ) -> Result<Self, InputError> {
        let wall_area = height.map(|h| finite(plan.wall_area(h))).transpose()?;
        let volume = height.map(|h| finite(plan.volume(h))).transpose()?;
        Ok(Self {
            shape,
            unit,
            plan,
            height,
            floor_area: round2(finite(plan.floor_area())?),
            perimeter: round2(finite(plan.perimeter())?),
            wall_area: wall_area.map(round2),
            volume: volume.map(round3),
            deductions: Vec::new(),
        })
    }

    pub fn deducted_area(&self) -> f64 {
        round2(self.deductions.iter().map(|d| d.area).sum())
    }

    pub fn net_wall_area(&self) -> Option<f64> {
        self.wall_area
            .map(|wall| round2((wall - self.deducted_area()).max(0.0)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialUnit {
    #[serde(rename = "м²")]
    SquareMeter,
    #[serde(rename = "м")]
    LinearMeter,
    #[serde(rename = "шт")]
    Piece,
    #[serde(rename = "рулон")]
    Roll,
}

impl MaterialUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            MaterialUnit::SquareMeter => "м²",
            MaterialUnit::LinearMeter => "м",
            MaterialUnit::Piece => "шт",
            MaterialUnit::Roll => "рулон",
        }
    }

    pub fn is_area_based(self) -> bool {
        matches!(self, MaterialUnit::SquareMeter)
    }
}

impl fmt::Display for MaterialUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialCalculation {
    pub quantity: f64,
    pub price_per_unit: f64,
    pub unit: MaterialUnit,
    pub waste_percent: f64,
    pub discount_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialEstimate {
    pub amount: f64,
    pub base_cost: f64,
    pub discount: f64,
    pub total_cost: f64,
}

impl MaterialCalculation {
    pub fn new(quantity: f64, price_per_unit: f64, unit: MaterialUnit) -> Self {
        Self {
            quantity,
            price_per_unit,
            unit,
            waste_percent: DEFAULT_WASTE_PERCENT,
            discount_percent: 0.0,
        }
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn with_waste(mut self, percent: f64) -> Self {
        self.waste_percent = percent;
        self
    }

    pub fn calculate(&self) -> Result<MaterialEstimate, InputError> {
        let amount = if self.unit.is_area_based() {
            self.quantity * (1.0 + self.waste_percent / 100.0)
        } else {
            self.quantity
        };
        let base_cost = finite(amount * self.price_per_unit)?;
        let discount = base_cost * (self.discount_percent / 100.0);
        Ok(MaterialEstimate {
            amount: round2(finite(amount)?),
            base_cost: round2(base_cost),
            discount: round2(discount),
            total_cost: round2(base_cost - discount),
        })
    }
}
