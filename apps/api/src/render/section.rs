//! Section Dispatcher: maps one `SectionMeta` to a rendered section.
//!
//! Each built-in key has an emptiness rule: a section with no backing data is
//! absent (`Ok(None)`) whatever its visibility. Non-default keys go to the
//! custom-section renderer untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::errors::RenderError;
use crate::models::resume::{
    Education, EntryId, PersonalProject, ResumeData, SectionKey, SectionMeta, WorkExperience,
};
use crate::render::additional::{render_additional, EntryPlan};
use crate::render::collaborators::SafeFragment;
use crate::render::contact::{link_pill, LinkPill, PillKind};
use crate::render::RenderContext;

// ────────────────────────────────────────────────────────────────────────────
// Rendered types
// ────────────────────────────────────────────────────────────────────────────

/// A titled body block. `id` is the section meta id, used as the render key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub id: String,
    pub key: SectionKey,
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionBody {
    Summary { text: String, justified: bool },
    WorkExperience { items: Vec<ExperienceItem> },
    PersonalProjects { items: Vec<ProjectItem> },
    Education { items: Vec<EducationItem> },
    Additional { categories: Vec<EntryPlan> },
    CustomText { text: String },
    CustomItems { items: Vec<CustomItemView> },
    CustomStrings { strings: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub id: EntryId,
    pub title: String,
    /// Right-aligned on the title row.
    pub date_range: String,
    pub company: String,
    pub location: Option<String>,
    pub bullets: Vec<SafeFragment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: EntryId,
    pub name: String,
    /// GitHub pill first, then website.
    pub links: Vec<LinkPill>,
    pub date_range: Option<String>,
    pub role: Option<String>,
    pub bullets: Vec<SafeFragment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub id: EntryId,
    pub institution: String,
    pub date_range: String,
    pub degree: String,
    /// Plain paragraph; never interpreted as markup.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItemView {
    pub id: EntryId,
    pub title: String,
    pub subtitle: Option<String>,
    pub date_range: Option<String>,
    pub bullets: Vec<SafeFragment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

/// Renders one section, or `Ok(None)` when it has nothing to show.
///
/// `personalInfo` is always `None` here; the composer renders it as the header.
pub fn render_section(
    meta: &SectionMeta,
    data: &ResumeData,
    ctx: &RenderContext<'_>,
) -> Result<Option<RenderedSection>, RenderError> {
    trace!(section = %meta.key, id = %meta.id, "dispatching section");

    let body = match &meta.key {
        SectionKey::PersonalInfo => None,
        SectionKey::Summary => non_empty(data.summary.as_deref()).map(|text| SectionBody::Summary {
            text: text.to_string(),
            justified: true,
        }),
        SectionKey::WorkExperience => render_work_experience(&data.work_experience, ctx)?,
        SectionKey::PersonalProjects => render_projects(&data.personal_projects, ctx)?,
        SectionKey::Education => render_education(&data.education, ctx)?,
        SectionKey::Additional => data
            .additional
            .as_ref()
            .and_then(|additional| render_additional(additional, ctx.labels))
            .map(|categories| SectionBody::Additional { categories }),
        SectionKey::Custom(key) => {
            if meta.is_default {
                debug!(key = %key, "unrecognized default section key, skipping");
                return Ok(None);
            }
            debug!(key = %key, id = %meta.id, "delegating to custom section renderer");
            return ctx.custom.render_custom(meta, data);
        }
    };

    if body.is_none() {
        debug!(section = %meta.key, "section has no content, skipping");
    }

    let title = match (&meta.key, meta.display_name.is_empty()) {
        (SectionKey::Additional, true) => ctx.labels.section_title.clone(),
        _ => meta.display_name.clone(),
    };

    Ok(body.map(|body| RenderedSection {
        id: meta.id.clone(),
        key: meta.key.clone(),
        title,
        body,
    }))
}

fn render_work_experience(
    entries: &[WorkExperience],
    ctx: &RenderContext<'_>,
) -> Result<Option<SectionBody>, RenderError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let items = entries
        .iter()
        .map(|exp| {
            Ok(ExperienceItem {
                id: exp.id.clone(),
                title: exp.title.clone(),
                date_range: ctx.dates.format_range(&exp.years)?,
                company: exp.company.clone(),
                location: non_empty(exp.location.as_deref()).map(str::to_string),
                bullets: sanitize_bullets(&exp.description, ctx),
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(Some(SectionBody::WorkExperience { items }))
}

fn render_projects(
    entries: &[PersonalProject],
    ctx: &RenderContext<'_>,
) -> Result<Option<SectionBody>, RenderError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let items = entries
        .iter()
        .map(|project| {
            let links = [
                link_pill(PillKind::Github, project.github.as_deref()),
                link_pill(PillKind::Website, project.website.as_deref()),
            ]
            .into_iter()
            .flatten()
            .collect();

            let date_range = match non_empty(project.years.as_deref()) {
                Some(years) => Some(ctx.dates.format_range(years)?),
                None => None,
            };

            Ok(ProjectItem {
                id: project.id.clone(),
                name: project.name.clone(),
                links,
                date_range,
                role: non_empty(project.role.as_deref()).map(str::to_string),
                bullets: sanitize_bullets(&project.description, ctx),
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(Some(SectionBody::PersonalProjects { items }))
}

fn render_education(
    entries: &[Education],
    ctx: &RenderContext<'_>,
) -> Result<Option<SectionBody>, RenderError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let items = entries
        .iter()
        .map(|edu| {
            Ok(EducationItem {
                id: edu.id.clone(),
                institution: edu.institution.clone(),
                date_range: ctx.dates.format_range(&edu.years)?,
                degree: edu.degree.clone(),
                description: non_empty(edu.description.as_deref()).map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(Some(SectionBody::Education { items }))
}

/// Sanitizes every bullet; an empty description yields an empty list (no bullet block).
pub(crate) fn sanitize_bullets(bullets: &[String], ctx: &RenderContext<'_>) -> Vec<SafeFragment> {
    bullets
        .iter()
        .map(|bullet| ctx.sanitizer.sanitize(bullet))
        .collect()
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::AdditionalInfo;
    use crate::render::additional::AdditionalLabels;
    use crate::render::collaborators::{
        CustomSectionRenderer, DateRangeFormatter, HtmlSanitizer, InlineMarkupSanitizer,
        NoCustomSections, YearRangeFormatter,
    };

    struct FailingDates;

    impl DateRangeFormatter for FailingDates {
        fn format_range(&self, years: &str) -> Result<String, RenderError> {
            Err(RenderError::MalformedDateRange {
                input: years.to_string(),
                reason: "unparseable".to_string(),
            })
        }
    }

    struct EchoCustom;

    impl CustomSectionRenderer for EchoCustom {
        fn render_custom(
            &self,
            meta: &SectionMeta,
            _data: &ResumeData,
        ) -> Result<Option<RenderedSection>, RenderError> {
            Ok(Some(RenderedSection {
                id: meta.id.clone(),
                key: meta.key.clone(),
                title: meta.display_name.clone(),
                body: SectionBody::CustomText {
                    text: "custom".to_string(),
                },
            }))
        }
    }

    fn make_ctx<'a>(
        labels: &'a AdditionalLabels,
        dates: &'a dyn DateRangeFormatter,
        sanitizer: &'a dyn HtmlSanitizer,
        custom: &'a dyn CustomSectionRenderer,
    ) -> RenderContext<'a> {
        RenderContext {
            labels,
            dates,
            sanitizer,
            custom,
        }
    }

    fn make_experience(id: i64, description: Vec<&str>) -> WorkExperience {
        WorkExperience {
            id: EntryId::Number(id),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            years: "2020 - Present".to_string(),
            description: description.into_iter().map(str::to_string).collect(),
        }
    }

    fn make_project(github: Option<&str>, website: Option<&str>, years: Option<&str>) -> PersonalProject {
        PersonalProject {
            id: EntryId::Number(1),
            name: "X".to_string(),
            role: None,
            years: years.map(str::to_string),
            github: github.map(str::to_string),
            website: website.map(str::to_string),
            description: vec![],
        }
    }

    fn meta(key: SectionKey, display: &str) -> SectionMeta {
        SectionMeta::builtin(key, display, 0)
    }

    fn render(meta: &SectionMeta, data: &ResumeData) -> Result<Option<RenderedSection>, RenderError> {
        let labels = AdditionalLabels::default();
        let ctx = make_ctx(&labels, &YearRangeFormatter, &InlineMarkupSanitizer, &NoCustomSections);
        render_section(meta, data, &ctx)
    }

    // ── summary ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_absent_when_empty() {
        let data = ResumeData {
            summary: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(render(&meta(SectionKey::Summary, "Summary"), &data), Ok(None));
        assert_eq!(
            render(&meta(SectionKey::Summary, "Summary"), &ResumeData::default()),
            Ok(None)
        );
    }

    #[test]
    fn test_summary_rendered_justified_with_display_name() {
        let data = ResumeData {
            summary: Some("Builds things.".to_string()),
            ..Default::default()
        };
        let section = render(&meta(SectionKey::Summary, "Profile"), &data)
            .expect("no error")
            .expect("present");
        assert_eq!(section.title, "Profile");
        assert_eq!(
            section.body,
            SectionBody::Summary {
                text: "Builds things.".to_string(),
                justified: true
            }
        );
    }

    // ── work experience ─────────────────────────────────────────────────────

    #[test]
    fn test_work_experience_absent_when_empty() {
        let m = meta(SectionKey::WorkExperience, "Experience");
        assert_eq!(render(&m, &ResumeData::default()), Ok(None));
    }

    #[test]
    fn test_work_experience_items_keep_ids_and_sanitize_bullets() {
        let data = ResumeData {
            work_experience: vec![
                make_experience(7, vec!["Cut latency by <b>40%</b>", "<script>x</script>"]),
                make_experience(9, vec![]),
            ],
            ..Default::default()
        };
        let section = render(&meta(SectionKey::WorkExperience, "Experience"), &data)
            .expect("no error")
            .expect("present");
        let SectionBody::WorkExperience { items } = section.body else {
            panic!("expected work experience body");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, EntryId::Number(7));
        assert_eq!(items[0].date_range, "2020 - Present");
        assert_eq!(items[0].bullets[0].as_str(), "Cut latency by <b>40%</b>");
        assert_eq!(items[0].bullets[1].as_str(), "&lt;script&gt;x&lt;/script&gt;");
        assert!(items[1].bullets.is_empty());
    }

    #[test]
    fn test_formatter_error_propagates() {
        let data = ResumeData {
            work_experience: vec![make_experience(1, vec![])],
            ..Default::default()
        };
        let labels = AdditionalLabels::default();
        let ctx = make_ctx(&labels, &FailingDates, &InlineMarkupSanitizer, &NoCustomSections);
        let result = render_section(&meta(SectionKey::WorkExperience, "Experience"), &data, &ctx);
        assert!(matches!(result, Err(RenderError::MalformedDateRange { .. })));
    }

    // ── projects ────────────────────────────────────────────────────────────

    #[test]
    fn test_project_pill_without_scheme() {
        let data = ResumeData {
            personal_projects: vec![make_project(Some("github.com/acme/x"), None, None)],
            ..Default::default()
        };
        let section = render(&meta(SectionKey::PersonalProjects, "Projects"), &data)
            .expect("no error")
            .expect("present");
        let SectionBody::PersonalProjects { items } = section.body else {
            panic!("expected projects body");
        };
        assert_eq!(items[0].links.len(), 1);
        assert_eq!(items[0].links[0].display_text, "github.com/acme/x");
        assert_eq!(items[0].links[0].href, "https://github.com/acme/x");
        assert_eq!(items[0].date_range, None);
    }

    #[test]
    fn test_project_links_ordered_github_then_website() {
        let data = ResumeData {
            personal_projects: vec![make_project(
                Some("github.com/acme/x"),
                Some("https://acme.dev/"),
                Some("2021"),
            )],
            ..Default::default()
        };
        let section = render(&meta(SectionKey::PersonalProjects, "Projects"), &data)
            .expect("no error")
            .expect("present");
        let SectionBody::PersonalProjects { items } = section.body else {
            panic!("expected projects body");
        };
        let kinds: Vec<PillKind> = items[0].links.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![PillKind::Github, PillKind::Website]);
        assert_eq!(items[0].links[1].display_text, "acme.dev");
        assert_eq!(items[0].date_range.as_deref(), Some("2021"));
    }

    // ── education ───────────────────────────────────────────────────────────

    #[test]
    fn test_education_optional_description() {
        let data = ResumeData {
            education: vec![Education {
                id: EntryId::Number(1),
                institution: "MIT".to_string(),
                degree: "B.S.".to_string(),
                years: "2014 - 2018".to_string(),
                description: Some(String::new()),
            }],
            ..Default::default()
        };
        let section = render(&meta(SectionKey::Education, "Education"), &data)
            .expect("no error")
            .expect("present");
        let SectionBody::Education { items } = section.body else {
            panic!("expected education body");
        };
        assert_eq!(items[0].institution, "MIT");
        assert_eq!(items[0].description, None);
    }

    // ── additional ──────────────────────────────────────────────────────────

    #[test]
    fn test_additional_absent_when_missing_or_all_empty() {
        let m = meta(SectionKey::Additional, "Skills");
        assert_eq!(render(&m, &ResumeData::default()), Ok(None));
        let data = ResumeData {
            additional: Some(AdditionalInfo::default()),
            ..Default::default()
        };
        assert_eq!(render(&m, &data), Ok(None));
    }

    #[test]
    fn test_additional_uses_default_title_when_display_name_blank() {
        let data = ResumeData {
            additional: Some(AdditionalInfo {
                awards: vec!["Best Paper".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let section = render(&meta(SectionKey::Additional, ""), &data)
            .expect("no error")
            .expect("present");
        assert_eq!(section.title, "Technical Skills & Designations");
    }

    // ── personal info / custom keys ─────────────────────────────────────────

    #[test]
    fn test_personal_info_never_dispatched() {
        let data = ResumeData {
            personal_info: Some(Default::default()),
            ..Default::default()
        };
        assert_eq!(render(&meta(SectionKey::PersonalInfo, "Header"), &data), Ok(None));
    }

    #[test]
    fn test_non_default_custom_key_delegates() {
        let labels = AdditionalLabels::default();
        let ctx = make_ctx(&labels, &YearRangeFormatter, &InlineMarkupSanitizer, &EchoCustom);
        let m = SectionMeta::custom("publications", "Publications", 3);
        let section = render_section(&m, &ResumeData::default(), &ctx)
            .expect("no error")
            .expect("present");
        assert_eq!(section.id, "publications");
        assert_eq!(
            section.body,
            SectionBody::CustomText {
                text: "custom".to_string()
            }
        );
    }

    #[test]
    fn test_default_flagged_unknown_key_is_noop() {
        let labels = AdditionalLabels::default();
        let ctx = make_ctx(&labels, &YearRangeFormatter, &InlineMarkupSanitizer, &EchoCustom);
        let m = SectionMeta {
            is_default: true,
            ..SectionMeta::custom("mystery", "Mystery", 0)
        };
        assert_eq!(render_section(&m, &ResumeData::default(), &ctx), Ok(None));
    }
}
