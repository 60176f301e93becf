pub mod prelude;

pub mod todo_item;
pub mod todo_list;
