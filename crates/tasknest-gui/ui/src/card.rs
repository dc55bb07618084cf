//! Task card logic that does not touch the DOM: the phase machine driving
//! the card and the view model rendered from it.

mod state;
mod view;

pub use state::{
  CardEffect,
  CardEvent,
  CardState,
  InFlightGuard,
  ToastKind,
  ToastMessage,
  route_effect
};
pub use view::CardView;
