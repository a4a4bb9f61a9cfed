use std::fmt;

use serde::{Deserialize, Serialize};

/// What the landing page is meant to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    #[serde(rename = "Open Day Registration")]
    OpenDayRegistration,
    #[serde(rename = "Pre-Clearing Enquiry Form")]
    PreClearingEnquiry,
    #[serde(rename = "Drive Applications")]
    DriveApplications,
    #[serde(rename = "Course Information")]
    CourseInformation,
}

impl Objective {
    pub fn label(self) -> &'static str {
        match self {
            Objective::OpenDayRegistration => "Open Day Registration",
            Objective::PreClearingEnquiry => "Pre-Clearing Enquiry Form",
            Objective::DriveApplications => "Drive Applications",
            Objective::CourseInformation => "Course Information",
        }
    }

    /// Registration, enquiry and application pages need a form to convert.
    pub fn requires_form(self) -> bool {
        !matches!(self, Objective::CourseInformation)
    }

    pub fn is_open_day(self) -> bool {
        matches!(self, Objective::OpenDayRegistration)
    }

    /// CTA wording expected for this objective (lower-case substrings).
    pub fn expected_cta_keywords(self) -> &'static [&'static str] {
        match self {
            Objective::OpenDayRegistration => &["book", "register", "open day"],
            Objective::PreClearingEnquiry => &["enquire", "contact", "clearing"],
            Objective::DriveApplications => &["apply", "application"],
            Objective::CourseInformation => &["learn more", "download", "prospectus", "find out"],
        }
    }

    /// Example button label suggested when the expected CTA is missing.
    pub fn suggested_cta(self) -> &'static str {
        match self {
            Objective::OpenDayRegistration => "Book Open Day",
            Objective::PreClearingEnquiry => "Enquire Now",
            Objective::DriveApplications => "Apply Now",
            Objective::CourseInformation => "Download Prospectus",
        }
    }

    /// What students must find quickly on this kind of page.
    pub fn key_information(self) -> &'static str {
        match self {
            Objective::OpenDayRegistration => {
                "Event date, time, and location should be clear and prominent. What to expect at the open day."
            }
            Objective::PreClearingEnquiry => {
                "Course availability and next steps should be obvious. Why enquire now."
            }
            Objective::DriveApplications => {
                "Course benefits and application deadline should be clear. Why apply to this course."
            }
            Objective::CourseInformation => {
                "Course content, entry requirements, and what makes it unique should be visible."
            }
        }
    }

    pub fn cta_guidance(self) -> &'static str {
        match self {
            Objective::OpenDayRegistration => {
                "For open day pages, look for 'Book Now' or 'Register' buttons prominently placed."
            }
            Objective::PreClearingEnquiry => {
                "For clearing enquiries, look for 'Enquire Now' or contact forms."
            }
            Objective::DriveApplications => {
                "For application pages, 'Apply Now' buttons should be prominent and high on the page."
            }
            Objective::CourseInformation => {
                "For course info pages, look for 'Learn More', 'Download Prospectus' or 'Find Out More' buttons."
            }
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
