//! Structured tokens carried in inline-button callback data.
//!
//! Telegram limits callback data to 64 bytes, which is why list names are
//! capped and items are addressed by position.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::calc::{DeductionKind, LengthUnit, RoomShape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Menu,
    Skip,
    Shape(RoomShape),
    Unit(LengthUnit),
    Deduction(DeductionKind),
    DeductionsDone,
    /// Position in the flat catalog material list.
    Material(usize),
    Catalog,
    Category(usize),
    Subcategory(usize, usize),
    Lists,
    OpenList(String),
    NewList,
    AddItem(String),
    RemoveItem(String, usize),
    ClearList(String),
    DeleteList(String),
    DeleteCalculation(i64),
    NewNote,
    DeleteNote(i64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Menu => f.write_str("menu"),
            Action::Skip => f.write_str("skip"),
            Action::Shape(shape) => write!(f, "shape:{}", shape.code()),
            Action::Unit(unit) => write!(f, "unit:{}", unit.code()),
            Action::Deduction(kind) => write!(f, "ded:{}", kind.code()),
            Action::DeductionsDone => f.write_str("ded:done"),
            Action::Material(index) => write!(f, "mat:{index}"),
            Action::Catalog => f.write_str("catalog"),
            Action::Category(index) => write!(f, "cat:{index}"),
            Action::Subcategory(cat, sub) => write!(f, "sub:{cat}:{sub}"),
            Action::Lists => f.write_str("lists"),
            Action::OpenList(list) => write!(f, "list:{list}"),
            Action::NewList => f.write_str("newlist"),
            Action::AddItem(list) => write!(f, "additem:{list}"),
            Action::RemoveItem(list, index) => write!(f, "rm:{index}:{list}"),
            Action::ClearList(list) => write!(f, "clear:{list}"),
            Action::DeleteList(list) => write!(f, "dellist:{list}"),
            Action::DeleteCalculation(id) => write!(f, "delcalc:{id}"),
            Action::NewNote => f.write_str("newnote"),
            Action::DeleteNote(id) => write!(f, "delnote:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action token {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(s.to_string());
        let action = match s {
            "menu" => Action::Menu,
            "skip" => Action::Skip,
            "ded:done" => Action::DeductionsDone,
            "catalog" => Action::Catalog,
            "lists" => Action::Lists,
            "newlist" => Action::NewList,
            "newnote" => Action::NewNote,
            _ => {
                let (tag, rest) = s.split_once(':').ok_or_else(unknown)?;
                match tag {
                    "shape" => Action::Shape(RoomShape::from_code(rest).ok_or_else(unknown)?),
                    "unit" => Action::Unit(LengthUnit::from_code(rest).ok_or_else(unknown)?),
                    "ded" => Action::Deduction(DeductionKind::from_code(rest).ok_or_else(unknown)?),
                    "mat" => Action::Material(rest.parse().map_err(|_| unknown())?),
                    "cat" => Action::Category(rest.parse().map_err(|_| unknown())?),
                    "sub" => {
                        let (cat, sub) = rest.split_once(':').ok_or_else(unknown)?;
                        Action::Subcategory(
                            cat.parse().map_err(|_| unknown())?,
                            sub.parse().map_err(|_| unknown())?,
                        )
                    }
                    "list" if !rest.is_empty() => Action::OpenList(rest.to_string()),
                    "additem" if !rest.is_empty() => Action::AddItem(rest.to_string()),
                    "rm" => {
                        let (index, list) = rest.split_once(':').ok_or_else(unknown)?;
                        Action::RemoveItem(list.to_string(), index.parse().map_err(|_| unknown())?)
                    }
                    "clear" if !rest.is_empty() => Action::ClearList(rest.to_string()),
                    "dellist" if !rest.is_empty() => Action::DeleteList(rest.to_string()),
                    "delcalc" => Action::DeleteCalculation(rest.parse().map_err(|_| unknown())?),
                    "delnote" => Action::DeleteNote(rest.parse().map_err(|_| unknown())?),
                    _ => return Err(unknown()),
                }
            }
        };
        Ok(action)
    }
}
