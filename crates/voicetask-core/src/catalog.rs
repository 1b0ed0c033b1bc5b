//! Built-in task content.

/// Passage read aloud in the text reading task.
pub const SAMPLE_PASSAGE: &str = "Mega long lasting fragrance...";

/// Instruction shown with the passage.
pub const READING_INSTRUCTION: &str = "Read the passage aloud in your native language.";

/// Instruction shown with the image in the description task.
pub const DESCRIPTION_INSTRUCTION: &str = "Describe what you see in your native language.";

/// Self-checks the reader confirms before a reading can be submitted.
pub const READING_CHECKLIST: &[&str] = &[
    "No background noise",
    "No mistakes while reading",
    "Beech me koi galti nahi hai",
];

/// Images offered in the description task.
pub const SAMPLE_IMAGE_URLS: &[&str] = &[
    "https://drive.google.com/open?id=1mog2XhYf5yifkHZxGXR3I3VjOKPiTL7q&usp=drive_copy",
    "https://drive.google.com/open?id=136A6wn0rTXQxY-sLBPrL8qekdzmsO65F&usp=drive_copy",
    "https://drive.google.com/open?id=18ECru540TAkLPGIo43dhsrWawOMxS0WM&usp=drive_copy",
    "https://drive.google.com/open?id=1Gf3NX_Pvrt3P2q8Z8GIB8jjKaltPbXCx&usp=drive_copy",
    "https://drive.google.com/open?id=1qJIL9KtDn3cbKFZprw17rkXDCxCfAfDh&usp=drive_copy",
    "https://drive.google.com/open?id=1K10BqY_xRnwbdIGWTtG-XmccPtJNgNJY&usp=drive_copy",
];

/// Get a sample image URL by its 1-based position
pub fn sample_image(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|i| SAMPLE_IMAGE_URLS.get(i))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_image_is_one_based() {
        assert_eq!(sample_image(1), Some(SAMPLE_IMAGE_URLS[0]));
        assert_eq!(sample_image(6), Some(SAMPLE_IMAGE_URLS[5]));
        assert_eq!(sample_image(0), None);
        assert_eq!(sample_image(7), None);
    }
}
