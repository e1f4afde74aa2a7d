use dioxus::prelude::*;

use crate::routes::Route;

struct CourseCard {
    id: &'static str,
    title: &'static str,
    summary: &'static str,
}

const CATALOG: &[CourseCard] = &[
    CourseCard {
        id: "intro-programming",
        title: "Introduction to Programming",
        summary: "Variables, control flow and your first programs.",
    },
    CourseCard {
        id: "data-structures",
        title: "Data Structures",
        summary: "Lists, trees, maps and when to use each.",
    },
    CourseCard {
        id: "web-fundamentals",
        title: "Web Fundamentals",
        summary: "How browsers, servers and HTTP fit together.",
    },
];

/// Public course catalog.
#[component]
pub fn Courses() -> Element {
    rsx! {
        section { class: "page",
            h1 { "Courses" }
            div { class: "course-grid",
                for course in CATALOG {
                    div { key: "{course.id}", class: "course-card",
                        h2 { "{course.title}" }
                        p { "{course.summary}" }
                        Link { to: Route::CourseDetail { id: course.id.to_string() }, "View course" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn CourseDetail(id: String) -> Element {
    let course = CATALOG.iter().find(|c| c.id == id);

    rsx! {
        section { class: "page",
            match course {
                Some(course) => rsx! {
                    h1 { "{course.title}" }
                    p { "{course.summary}" }
                },
                None => rsx! {
                    h1 { "Course not found" }
                    p { "No course with id " code { "{id}" } "." }
                },
            }
            Link { to: Route::Courses {}, "All courses" }
        }
    }
}
