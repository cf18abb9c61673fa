//! Conversation state machine.
//!
//! [`step`] is pure: it takes the current [`State`] and one [`Input`] and
//! returns the next state, the reply to send and at most one [`Effect`] for
//! the handler layer to carry out (persisting, calling the AI backend).
//! Invalid input never changes the state; the prompt for the current step is
//! sent again with the error on top.

pub mod action;
pub mod menu;
pub mod reply;
pub mod state;

pub use action::Action;
pub use menu::MenuItem;
pub use reply::{Button, Keyboard, Reply};
pub use state::State;

use crate::calc::{
    finite, positive, Deduction, DeductionKind, LengthUnit, MaterialCalculation, Plan, RoomReport,
    RoomShape,
};
use crate::catalog::Catalog;
use crate::messages::{self, escape_html};
use crate::shopping_list::ShoppingItem;
use crate::text_utils::{
    capitalize_first, parse_free_text, parse_material_and_quantity, parse_percent,
    parse_positive, parse_quantity, parse_two_numbers, InputError, MAX_ITEM_NAME_CHARS,
    MAX_LIST_NAME_CHARS, MAX_NOTE_CHARS, MAX_QUESTION_CHARS,
};

/// Read-only data a step may consult.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub catalog: &'a Catalog,
    pub ai_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Action(Action),
}

impl Input {
    pub fn is_main_menu(&self) -> bool {
        match self {
            Input::Text(text) => MenuItem::from_label(text) == Some(MenuItem::MainMenu),
            Input::Action(action) => *action == Action::Menu,
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SaveCalculation(RoomReport),
    SaveNote(String),
    CreateList(String),
    AddItem { list: String, item: ShoppingItem },
    Ask(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: State,
    pub reply: Option<Reply>,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(next: State, reply: Reply) -> Self {
        Self {
            next,
            reply: Some(reply),
            effect: None,
        }
    }

    /// Enter `next` and send its prompt.
    fn enter(next: State, ctx: &FlowContext<'_>) -> Self {
        let reply = prompt(&next, ctx);
        Self::to(next, reply)
    }

    fn done(reply: Option<Reply>, effect: Effect) -> Self {
        Self {
            next: State::Idle,
            reply,
            effect: Some(effect),
        }
    }
}

/// Advance the conversation by one input.
pub fn step(state: State, input: Input, ctx: &FlowContext<'_>) -> Transition {
    if input.is_main_menu() {
        return Transition::to(State::Idle, Reply::main_menu(messages::MAIN_MENU_TEXT));
    }
    match advance(state.clone(), input, ctx) {
        Ok(transition) => transition,
        Err(err) => {
            tracing::debug!(state = state.name(), error = %err, "Rejected input");
            let notice = format!("⚠️ {}", escape_html(&err.to_string()));
            let reply = prompt(&state, ctx).prefixed(&notice);
            Transition::to(state, reply)
        }
    }
}

fn expect_text(input: Input) -> Result<String, InputError> {
    match input {
        Input::Text(text) if MenuItem::from_label(&text).is_some() => {
            Err(InputError::MenuDuringInput)
        }
        Input::Text(text) => Ok(text),
        Input::Action(_) => Err(InputError::ExpectedText),
    }
}

fn expect_action(input: Input) -> Result<Action, InputError> {
    match input {
        Input::Action(action) => Ok(action),
        Input::Text(_) => Err(InputError::UnexpectedChoice),
    }
}

fn length_in_meters(text: &str, unit: LengthUnit) -> Result<f64, InputError> {
    positive(unit.to_meters(parse_positive(text)?))
}

fn advance(state: State, input: Input, ctx: &FlowContext<'_>) -> Result<Transition, InputError> {
    let transition = match state {
        State::Idle => idle(input, ctx),

        State::QuickArea => {
            let (length, width) = parse_two_numbers(&expect_text(input)?)?;
            Transition::to(
                State::Idle,
                Reply::main_menu(messages::quick_area(finite(length * width)?)),
            )
        }

        State::RoomShape => match expect_action(input)? {
            Action::Shape(shape) => Transition::enter(State::RoomUnit { shape }, ctx),
            _ => return Err(InputError::UnexpectedChoice),
        },
        State::RoomUnit { shape } => match expect_action(input)? {
            Action::Unit(unit) => Transition::enter(State::RoomFirstDimension { shape, unit }, ctx),
            _ => return Err(InputError::UnexpectedChoice),
        },
        State::RoomFirstDimension { shape, unit } => {
            let value = length_in_meters(&expect_text(input)?, unit)?;
            let next = match shape {
                RoomShape::Rectangular => State::RoomSecondDimension {
                    shape,
                    unit,
                    length: value,
                },
                RoomShape::Square => State::RoomHeight {
                    shape,
                    unit,
                    plan: Plan::square(value)?,
                },
                RoomShape::Circular => State::RoomHeight {
                    shape,
                    unit,
                    plan: Plan::circle(value)?,
                },
            };
            Transition::enter(next, ctx)
        }
        State::RoomSecondDimension {
            shape,
            unit,
            length,
        } => {
            let width = length_in_meters(&expect_text(input)?, unit)?;
            let plan = Plan::rectangle(length, width)?;
            Transition::enter(State::RoomHeight { shape, unit, plan }, ctx)
        }
        State::RoomHeight { shape, unit, plan } => match input {
            Input::Action(Action::Skip) => finish_room(RoomReport::new(shape, unit, plan, None)?),
            input => {
                let height = length_in_meters(&expect_text(input)?, unit)?;
                let report = RoomReport::new(shape, unit, plan, Some(height))?;
                let summary = messages::format_report(&report);
                let next = State::DeductionPrompt { report };
                let reply = prompt(&next, ctx).prefixed(&summary);
                Transition::to(next, reply)
            }
        },
        State::DeductionPrompt { report } => match expect_action(input)? {
            Action::Deduction(kind) => Transition::enter(State::DeductionLength { report, kind }, ctx),
            Action::DeductionsDone => finish_room(report),
            _ => return Err(InputError::UnexpectedChoice),
        },
        State::DeductionLength { report, kind } => {
            let length = length_in_meters(&expect_text(input)?, report.unit)?;
            Transition::enter(
                State::DeductionWidth {
                    report,
                    kind,
                    length,
                },
                ctx,
            )
        }
        State::DeductionWidth {
            mut report,
            kind,
            length,
        } => {
            let width = length_in_meters(&expect_text(input)?, report.unit)?;
            let deduction = Deduction::new(kind, length, width)?;
            report.deductions.push(deduction);
            let notice = messages::deduction_added(&deduction, report.net_wall_area());
            let next = State::DeductionPrompt { report };
            let reply = prompt(&next, ctx).prefixed(&notice);
            Transition::to(next, reply)
        }

        State::Budget => {
            let budget = parse_positive(&expect_text(input)?)?;
            let found = ctx.catalog.within_budget(budget);
            Transition::to(
                State::Idle,
                Reply::main_menu(messages::format_budget(budget, &found)),
            )
        }

        State::CostMaterial => match input {
            Input::Action(Action::Material(index)) => {
                let material = ctx
                    .catalog
                    .material(index)
                    .ok_or(InputError::UnexpectedChoice)?;
                Transition::enter(
                    State::CostQuantity {
                        material: material.name.to_string(),
                    },
                    ctx,
                )
            }
            input => {
                let text = expect_text(input)?;
                match parse_material_and_quantity(&text) {
                    Some((name, quantity)) if ctx.catalog.find_material(&name).is_some() => {
                        Transition::to(State::Idle, estimate(ctx, &name, quantity, 0.0)?)
                    }
                    _ => {
                        let material = ctx
                            .catalog
                            .find_material(&text)
                            .ok_or_else(|| InputError::UnknownMaterial(text.trim().to_string()))?;
                        Transition::enter(
                            State::CostQuantity {
                                material: material.name.to_string(),
                            },
                            ctx,
                        )
                    }
                }
            }
        },
        State::CostQuantity { material } => {
            let quantity = parse_positive(&expect_text(input)?)?;
            Transition::enter(State::CostDiscount { material, quantity }, ctx)
        }
        State::CostDiscount { material, quantity } => {
            let discount = match input {
                Input::Action(Action::Skip) => 0.0,
                input => parse_percent(&expect_text(input)?)?,
            };
            Transition::to(State::Idle, estimate(ctx, &material, quantity, discount)?)
        }

        State::ListName => {
            let name = parse_free_text(&expect_text(input)?, MAX_LIST_NAME_CHARS)?;
            Transition::done(None, Effect::CreateList(name))
        }
        State::ItemSelection { list } => {
            let item = match input {
                Input::Action(Action::Material(index)) => ctx
                    .catalog
                    .material(index)
                    .ok_or(InputError::UnexpectedChoice)?
                    .name
                    .to_string(),
                input => capitalize_first(&parse_free_text(
                    &expect_text(input)?,
                    MAX_ITEM_NAME_CHARS,
                )?),
            };
            Transition::enter(State::ItemQuantity { list, item }, ctx)
        }
        State::ItemQuantity { list, item } => {
            let item = match input {
                Input::Action(Action::Skip) => ShoppingItem::new(item),
                input => {
                    let (quantity, unit) = parse_quantity(&expect_text(input)?)?;
                    ShoppingItem::new(item).with_quantity(quantity, unit)
                }
            };
            Transition::done(None, Effect::AddItem { list, item })
        }

        State::NoteText => {
            let text = parse_free_text(&expect_text(input)?, MAX_NOTE_CHARS)?;
            Transition::done(None, Effect::SaveNote(text))
        }
        State::AiQuestion => {
            let question = parse_free_text(&expect_text(input)?, MAX_QUESTION_CHARS)?;
            Transition::done(
                Some(Reply::main_menu(messages::AI_THINKING)),
                Effect::Ask(question),
            )
        }
    };
    Ok(transition)
}

fn idle(input: Input, ctx: &FlowContext<'_>) -> Transition {
    match input {
        Input::Text(text) => match MenuItem::from_label(&text) {
            Some(MenuItem::QuickArea) => Transition::enter(State::QuickArea, ctx),
            Some(MenuItem::Room) => Transition::enter(State::RoomShape, ctx),
            Some(MenuItem::Cost) => Transition::enter(State::CostMaterial, ctx),
            Some(MenuItem::Budget) => Transition::enter(State::Budget, ctx),
            Some(MenuItem::Ask) if ctx.ai_enabled => Transition::enter(State::AiQuestion, ctx),
            Some(MenuItem::Ask) => {
                Transition::to(State::Idle, Reply::main_menu(messages::AI_DISABLED))
            }
            _ => Transition::to(State::Idle, Reply::main_menu(messages::IDLE_HINT)),
        },
        Input::Action(Action::NewList) => Transition::enter(State::ListName, ctx),
        Input::Action(Action::AddItem(list)) => Transition::enter(State::ItemSelection { list }, ctx),
        Input::Action(Action::NewNote) => Transition::enter(State::NoteText, ctx),
        Input::Action(_) => Transition::to(State::Idle, Reply::text(messages::UNKNOWN_ACTION)),
    }
}

fn finish_room(report: RoomReport) -> Transition {
    let reply = Reply::main_menu(messages::format_report(&report));
    Transition::done(Some(reply), Effect::SaveCalculation(report))
}

fn estimate(
    ctx: &FlowContext<'_>,
    name: &str,
    quantity: f64,
    discount: f64,
) -> Result<Reply, InputError> {
    let material = ctx
        .catalog
        .find_material(name)
        .ok_or_else(|| InputError::UnknownMaterial(name.to_string()))?;
    let entry = material.entry;
    let result = MaterialCalculation::new(quantity, entry.price, entry.unit)
        .with_discount(discount)
        .calculate()?;
    Ok(Reply::main_menu(messages::format_estimate(
        material.name,
        entry.price,
        entry.unit.symbol(),
        &result,
    )))
}

fn menu_row() -> Vec<Button> {
    vec![Button::new(messages::MENU_LABEL, Action::Menu)]
}

fn skip_keyboard() -> Keyboard {
    Keyboard::Inline(vec![
        vec![Button::new(messages::SKIP_LABEL, Action::Skip)],
        menu_row(),
    ])
}

fn materials_keyboard(ctx: &FlowContext<'_>) -> Keyboard {
    let buttons = ctx
        .catalog
        .materials()
        .iter()
        .enumerate()
        .map(|(index, m)| Button::new(m.name, Action::Material(index)))
        .collect();
    let mut rows = Keyboard::rows(buttons, 2);
    rows.push(menu_row());
    Keyboard::Inline(rows)
}

/// Prompt shown when entering `state`, and again after invalid input.
pub fn prompt(state: &State, ctx: &FlowContext<'_>) -> Reply {
    match state {
        State::Idle => Reply::main_menu(messages::MAIN_MENU_TEXT),
        State::QuickArea => Reply::text(messages::QUICK_AREA_PROMPT),
        State::RoomShape => {
            let mut rows: Vec<Vec<Button>> = RoomShape::ALL
                .into_iter()
                .map(|shape| vec![Button::new(shape.label(), Action::Shape(shape))])
                .collect();
            rows.push(menu_row());
            Reply::text(messages::SHAPE_PROMPT).with_keyboard(Keyboard::Inline(rows))
        }
        State::RoomUnit { .. } => {
            let units = LengthUnit::ALL
                .into_iter()
                .map(|unit| {
                    Button::new(
                        format!("{} ({})", unit.label(), unit.symbol()),
                        Action::Unit(unit),
                    )
                })
                .collect();
            Reply::text(messages::UNIT_PROMPT)
                .with_keyboard(Keyboard::Inline(vec![units, menu_row()]))
        }
        State::RoomFirstDimension { shape, unit } => Reply::text(match shape {
            RoomShape::Square => messages::side_prompt(unit.symbol()),
            RoomShape::Circular => messages::dimension_prompt(true, true, unit.symbol()),
            RoomShape::Rectangular => messages::dimension_prompt(true, false, unit.symbol()),
        }),
        State::RoomSecondDimension { unit, .. } => {
            Reply::text(messages::dimension_prompt(false, false, unit.symbol()))
        }
        State::RoomHeight { unit, .. } => {
            Reply::text(messages::height_prompt(unit.symbol())).with_keyboard(skip_keyboard())
        }
        State::DeductionPrompt { .. } => {
            let kinds = DeductionKind::ALL
                .into_iter()
                .map(|kind| Button::new(kind.label(), Action::Deduction(kind)))
                .collect();
            let done = vec![Button::new(
                messages::DEDUCTIONS_DONE_LABEL,
                Action::DeductionsDone,
            )];
            Reply::text(messages::DEDUCTION_PROMPT)
                .with_keyboard(Keyboard::Inline(vec![kinds, done]))
        }
        State::DeductionLength { report, kind } => Reply::text(
            messages::deduction_dimension_prompt(kind.name(), true, report.unit.symbol()),
        ),
        State::DeductionWidth { report, kind, .. } => Reply::text(
            messages::deduction_dimension_prompt(kind.name(), false, report.unit.symbol()),
        ),
        State::Budget => Reply::text(messages::BUDGET_PROMPT),
        State::CostMaterial => {
            Reply::text(messages::COST_MATERIAL_PROMPT).with_keyboard(materials_keyboard(ctx))
        }
        State::CostQuantity { material } => {
            let unit = ctx
                .catalog
                .find_material(material)
                .map_or("м²", |m| m.entry.unit.symbol());
            Reply::text(messages::cost_quantity_prompt(material, unit))
        }
        State::CostDiscount { .. } => {
            Reply::text(messages::DISCOUNT_PROMPT).with_keyboard(skip_keyboard())
        }
        State::ListName => Reply::text(messages::LIST_NAME_PROMPT),
        State::ItemSelection { list } => Reply::text(messages::item_selection_prompt(list))
            .with_keyboard(materials_keyboard(ctx)),
        State::ItemQuantity { .. } => {
            Reply::text(messages::ITEM_QUANTITY_PROMPT).with_keyboard(skip_keyboard())
        }
        State::NoteText => Reply::text(messages::NOTE_PROMPT),
        State::AiQuestion => Reply::text(messages::AI_QUESTION_PROMPT),
    }
}
