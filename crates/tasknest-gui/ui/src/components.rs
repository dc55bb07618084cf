mod delete_confirm_modal;
mod priority_badge;
mod task_card;
mod task_form;
mod task_tag_badge;
mod toast;

pub use delete_confirm_modal::DeleteConfirmModal;
pub use priority_badge::PriorityBadge;
pub use task_card::TaskCard;
pub use task_form::TaskForm;
pub use task_tag_badge::TaskTagBadge;
pub use toast::Toast;
