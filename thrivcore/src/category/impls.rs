use std::cmp::Ordering;
use super::{Categories, Category, CategoryNode};

impl Category {
    /// Display order: by `display_order` with unset values last, then name.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        match (self.display_order, other.display_order) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.name.cmp(&other.name))
    }
}

impl Categories {
    pub fn sort_for_display(&mut self) {
        self.0.sort_by(Category::display_cmp);
    }
}

impl CategoryNode {
    pub fn id(&self) -> i64 {
        self.category.id
    }
}
