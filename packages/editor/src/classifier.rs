//! # Element Classifier
//!
//! Marks the structural regions of arbitrary theme markup and tags the
//! elements inside them the operator may select.
//!
//! Region lookup is data: each [`Region`] has a [`LocatorChain`] tried in
//! priority order (explicit marker, semantic tag, ARIA role, class-name
//! patterns, structural position). Tagging is idempotent and is re-run
//! whenever the page reports new markup.

use crate::background::{classify_background, BackgroundClassification};
use crate::element::{ElementType, Region};
use crate::identity::{EDITABLE_ATTRIBUTE, TYPE_ATTRIBUTE};
use crate::locator::{Locator, LocatorChain, StructuralPosition};
use quickedit_common::{walk, Dom, NodeId};
use tracing::debug;

/// Attribute marking a structural region
pub const REGION_ATTRIBUTE: &str = "data-qe-region";

/// Ordered region lookup rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRules {
    pub rules: Vec<(Region, LocatorChain)>,
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            rules: vec![
                (
                    Region::Header,
                    LocatorChain::new(vec![
                        Locator::attribute(REGION_ATTRIBUTE, "header"),
                        Locator::tag("header"),
                        Locator::attribute("role", "banner"),
                        Locator::class_contains("site-header"),
                        Locator::class_contains("header"),
                        Locator::Structural(StructuralPosition::First),
                    ]),
                ),
                (
                    Region::Footer,
                    LocatorChain::new(vec![
                        Locator::attribute(REGION_ATTRIBUTE, "footer"),
                        Locator::tag("footer"),
                        Locator::attribute("role", "contentinfo"),
                        Locator::class_contains("site-footer"),
                        Locator::class_contains("footer"),
                        Locator::Structural(StructuralPosition::Last),
                    ]),
                ),
                (
                    Region::Content,
                    LocatorChain::new(vec![
                        Locator::attribute(REGION_ATTRIBUTE, "content"),
                        Locator::tag("main"),
                        Locator::attribute("role", "main"),
                        Locator::class_contains("site-content"),
                        Locator::class_contains("content"),
                        Locator::Structural(StructuralPosition::Main),
                    ]),
                ),
            ],
        }
    }
}

/// Outcome of one tagging pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggingReport {
    pub regions: Vec<(Region, NodeId)>,
    /// Elements newly marked editable in this pass
    pub newly_tagged: usize,
}

impl TaggingReport {
    pub fn region(&self, region: Region) -> Option<NodeId> {
        self.regions.iter().find(|(r, _)| *r == region).map(|(_, n)| *n)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementClassifier {
    rules: RegionRules,
}

impl ElementClassifier {
    pub fn new(rules: RegionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RegionRules {
        &self.rules
    }

    /// Tag regions and editable candidates across the whole document
    pub fn tag_editable_regions<D: Dom + ?Sized>(&self, dom: &mut D) -> TaggingReport {
        let mut report = TaggingReport::default();
        let root = dom.root();

        for (region, chain) in &self.rules.rules {
            let found = chain.locate_where(&*dom, |node| {
                node != root
                    && match dom.attribute(node, REGION_ATTRIBUTE) {
                        None => true,
                        Some(existing) => Region::from_attribute(&existing) == Some(*region),
                    }
            });

            match found {
                Some(node) => {
                    dom.set_attribute(node, REGION_ATTRIBUTE, region.as_str());
                    report.regions.push((*region, node));
                }
                None => debug!(region = region.as_str(), "Region not found"),
            }
        }

        let nodes = walk::descendants(&*dom, root);
        for node in nodes.into_iter().filter(|n| *n != root) {
            if dom.attribute(node, EDITABLE_ATTRIBUTE).is_some() {
                continue;
            }
            if let Some(element_type) = self.classify_element(&*dom, node) {
                dom.set_attribute(node, EDITABLE_ATTRIBUTE, "true");
                if dom.attribute(node, TYPE_ATTRIBUTE).is_none() {
                    dom.set_attribute(node, TYPE_ATTRIBUTE, element_type.as_str());
                }
                report.newly_tagged += 1;
            }
        }

        debug!(
            regions = report.regions.len(),
            newly_tagged = report.newly_tagged,
            "Tagged editable regions"
        );
        report
    }

    /// Editable type of a node, or `None` if it is not an edit target
    pub fn classify_element<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> Option<ElementType> {
        if let Some(explicit) = dom.attribute(node, TYPE_ATTRIBUTE) {
            return Some(ElementType::from_attribute(&explicit));
        }
        if let Some(region) = dom
            .attribute(node, REGION_ATTRIBUTE)
            .and_then(|r| Region::from_attribute(&r))
        {
            return Some(region.element_type());
        }

        let tag = dom.tag_name(node);
        let classes: Vec<String> = dom
            .class_list(node)
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let has_class = |pattern: &str| classes.iter().any(|c| c.contains(pattern));

        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(ElementType::Heading),
            "p" => Some(ElementType::Paragraph),
            "img" => Some(ElementType::Image),
            "button" => Some(ElementType::Button),
            "a" if has_class("btn") || has_class("button") => Some(ElementType::Button),
            _ if has_class("hero") => Some(ElementType::Hero),
            _ if has_class("card") => Some(ElementType::Card),
            _ if has_class("template") => Some(ElementType::Template),
            _ => None,
        }
    }

    pub fn classify_background<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> BackgroundClassification {
        classify_background(dom, node)
    }
}
