//! The fixed general-layer subject taxonomy.
//!
//! General-layer demos are filed under one of these subjects rather than a
//! stored category row; the list is part of the product definition and is
//! not user-editable.

/// Subjects available in the general layer, in display order.
pub const GENERAL_SUBJECTS: [&str; 8] = [
    "Physics",
    "Chemistry",
    "Mathematics",
    "Biology",
    "Computer Science",
    "Astronomy",
    "Earth Science",
    "Creative Tools",
];

/// Whether `name` is one of the fixed general-layer subjects.
#[must_use]
pub fn is_general_subject(name: &str) -> bool {
    GENERAL_SUBJECTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Physics", true)]
    #[case("Creative Tools", true)]
    #[case("physics", false)]
    #[case("Alchemy", false)]
    fn subject_membership(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_general_subject(name), expected);
    }

    #[test]
    fn subjects_are_unique() {
        let mut names = GENERAL_SUBJECTS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GENERAL_SUBJECTS.len());
    }
}
