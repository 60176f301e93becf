pub use super::todo_item::Entity as TodoItem;
pub use super::todo_list::Entity as TodoList;
