//! Parsed forms of the constraint text format

use crate::layout::Side;

/// Per-side values as written: either 1-4 positional values or labeled entries
#[derive(Debug, Clone, PartialEq)]
pub enum SideList<T> {
    /// `all`, `vertical horizontal`, `top horizontal bottom` or `top right bottom left`
    Positional(Vec<T>),
    /// `side:value` entries in source order; later entries win
    Labeled(Vec<(Side, T)>),
}

impl<T: Clone> SideList<T> {
    /// Positional list, or `None` unless there are 1 to 4 values
    pub fn positional(values: Vec<T>) -> Option<Self> {
        (1..=4)
            .contains(&values.len())
            .then_some(SideList::Positional(values))
    }

    /// Expand into `(side, value)` assignments in application order
    pub fn assignments(&self) -> Vec<(Side, T)> {
        match self {
            SideList::Labeled(entries) => entries.clone(),
            SideList::Positional(values) => {
                let (top, right, bottom, left) = match values.as_slice() {
                    [all] => (all, all, all, all),
                    [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
                    [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
                    [top, right, bottom, left] => (top, right, bottom, left),
                    _ => return vec![],
                };
                vec![
                    (Side::Top, top.clone()),
                    (Side::Right, right.clone()),
                    (Side::Bottom, bottom.clone()),
                    (Side::Left, left.clone()),
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_value_expansion() {
        let list = SideList::positional(vec![1, 2, 3]).unwrap();
        assert_eq!(
            list.assignments(),
            vec![
                (Side::Top, 1),
                (Side::Right, 2),
                (Side::Bottom, 3),
                (Side::Left, 2)
            ]
        );
    }

    #[test]
    fn test_positional_length_checked() {
        assert!(SideList::<i32>::positional(vec![]).is_none());
        assert!(SideList::positional(vec![1, 2, 3, 4, 5]).is_none());
    }

    #[test]
    fn test_labeled_keeps_order() {
        let list = SideList::Labeled(vec![(Side::Left, 1), (Side::Left, 2)]);
        assert_eq!(list.assignments(), vec![(Side::Left, 1), (Side::Left, 2)]);
    }
}
