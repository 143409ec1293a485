//! Three-level category tree with slug resolution.
//!
//! Slugs are derived from names with [`slugify`]. Siblings whose slugs
//! collide are disambiguated in tree order with numeric suffixes
//! (`shoes`, `shoes-2`, `shoes-3`), so every route resolves to exactly one
//! node.

use crate::models::{ArticleTypeDto, CategoryMenu, MasterCategoryDto, SubCategoryDto};
use crate::slug::slugify;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node at any of the three levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    /// Identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unique slug among siblings.
    pub slug: String,
    /// Next level down (empty for article types).
    pub children: Vec<CategoryNode>,
}

/// Identifiers of a resolved route, from master down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryPath {
    /// Master category.
    pub master: CategoryId,
    /// Sub-category.
    pub sub: Option<CategoryId>,
    /// Article type; only set together with `sub`.
    pub article_type: Option<CategoryId>,
}

impl CategoryPath {
    /// Path to a master category.
    #[must_use]
    pub const fn master(master: CategoryId) -> Self {
        Self {
            master,
            sub: None,
            article_type: None,
        }
    }

    /// Path to a sub-category.
    #[must_use]
    pub const fn sub(master: CategoryId, sub: CategoryId) -> Self {
        Self {
            master,
            sub: Some(sub),
            article_type: None,
        }
    }

    /// Path to an article type.
    #[must_use]
    pub const fn article_type(master: CategoryId, sub: CategoryId, article: CategoryId) -> Self {
        Self {
            master,
            sub: Some(sub),
            article_type: Some(article),
        }
    }

    /// Identifiers in order, as used in API paths.
    #[must_use]
    pub fn ids(&self) -> Vec<CategoryId> {
        let mut ids = vec![self.master];
        if let Some(sub) = self.sub {
            ids.push(sub);
            ids.extend(self.article_type);
        }
        ids
    }
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Slug for this level.
    pub slug: String,
}

/// The category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    masters: Vec<CategoryNode>,
}

impl CategoryTree {
    /// Build from nodes whose `slug` fields may be empty; slugs are
    /// recomputed from names.
    #[must_use]
    pub fn new(mut masters: Vec<CategoryNode>) -> Self {
        assign_slugs(&mut masters);
        Self { masters }
    }

    /// Build from the backend menu.
    #[must_use]
    pub fn from_menu(menu: CategoryMenu) -> Self {
        Self::new(menu.categories.into_iter().map(master_node).collect())
    }

    /// Master categories in tree order.
    #[must_use]
    pub fn masters(&self) -> &[CategoryNode] {
        &self.masters
    }

    /// Whether the tree has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masters.is_empty()
    }

    /// Resolve one to three slugs, master first.
    ///
    /// Fails closed: an empty or overlong slice, or any level that does not
    /// resolve, yields `None`.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, slugs: &[S]) -> Option<CategoryPath> {
        let (master_slug, rest) = slugs.split_first()?;
        if rest.len() > 2 {
            return None;
        }

        let master = find_by_slug(&self.masters, master_slug.as_ref())?;
        let mut path = CategoryPath::master(master.id);

        if let Some((sub_slug, rest)) = rest.split_first() {
            let sub = find_by_slug(&master.children, sub_slug.as_ref())?;
            path.sub = Some(sub.id);

            if let Some(article_slug) = rest.first() {
                let article = find_by_slug(&sub.children, article_slug.as_ref())?;
                path.article_type = Some(article.id);
            }
        }
        Some(path)
    }

    /// Master id for a slug.
    #[must_use]
    pub fn master_id_by_slug(&self, slug: &str) -> Option<CategoryId> {
        find_by_slug(&self.masters, slug).map(|node| node.id)
    }

    /// Sub-category id for a slug under `master`.
    #[must_use]
    pub fn sub_id_by_slug(&self, master: CategoryId, slug: &str) -> Option<CategoryId> {
        let master = find_by_id(&self.masters, master)?;
        find_by_slug(&master.children, slug).map(|node| node.id)
    }

    /// Article type id for a slug under `master` / `sub`.
    #[must_use]
    pub fn article_type_id_by_slug(
        &self,
        master: CategoryId,
        sub: CategoryId,
        slug: &str,
    ) -> Option<CategoryId> {
        let master = find_by_id(&self.masters, master)?;
        let sub = find_by_id(&master.children, sub)?;
        find_by_slug(&sub.children, slug).map(|node| node.id)
    }

    /// Nodes along `path`, master first. `None` if any id is unknown.
    #[must_use]
    pub fn nodes(&self, path: &CategoryPath) -> Option<Vec<&CategoryNode>> {
        let master = find_by_id(&self.masters, path.master)?;
        let mut nodes = vec![master];

        if let Some(sub_id) = path.sub {
            let sub = find_by_id(&master.children, sub_id)?;
            nodes.push(sub);
            if let Some(article_id) = path.article_type {
                nodes.push(find_by_id(&sub.children, article_id)?);
            }
        }
        Some(nodes)
    }

    /// Deepest node of `path`.
    #[must_use]
    pub fn node(&self, path: &CategoryPath) -> Option<&CategoryNode> {
        self.nodes(path)?.pop()
    }

    /// Display name of the deepest node.
    #[must_use]
    pub fn name(&self, path: &CategoryPath) -> Option<&str> {
        self.node(path).map(|node| node.name.as_str())
    }

    /// Description of the deepest node that has one, searching upwards.
    #[must_use]
    pub fn description(&self, path: &CategoryPath) -> Option<&str> {
        self.nodes(path)?
            .into_iter()
            .rev()
            .find_map(|node| node.description.as_deref())
    }

    /// Breadcrumb trail, master first.
    #[must_use]
    pub fn breadcrumb(&self, path: &CategoryPath) -> Option<Vec<Breadcrumb>> {
        Some(
            self.nodes(path)?
                .into_iter()
                .map(|node| Breadcrumb {
                    id: node.id,
                    name: node.name.clone(),
                    slug: node.slug.clone(),
                })
                .collect(),
        )
    }

    /// Route slugs for `path`, master first.
    #[must_use]
    pub fn route_slugs(&self, path: &CategoryPath) -> Option<Vec<String>> {
        Some(
            self.nodes(path)?
                .into_iter()
                .map(|node| node.slug.clone())
                .collect(),
        )
    }
}

fn find_by_slug<'a>(nodes: &'a [CategoryNode], slug: &str) -> Option<&'a CategoryNode> {
    if slug.is_empty() {
        return None;
    }
    nodes.iter().find(|node| node.slug == slug)
}

fn find_by_id(nodes: &[CategoryNode], id: CategoryId) -> Option<&CategoryNode> {
    nodes.iter().find(|node| node.id == id)
}

/// Give siblings unique slugs, recursively.
fn assign_slugs(nodes: &mut [CategoryNode]) {
    let bases: Vec<String> = nodes.iter().map(|node| slugify(&node.name)).collect();
    let natural: HashSet<&str> = bases.iter().map(String::as_str).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(nodes.len());

    for (node, base) in nodes.iter_mut().zip(&bases) {
        let mut slug = base.clone();
        let mut suffix = 2;
        while taken.contains(&slug) {
            slug = format!("{base}-{suffix}");
            suffix += 1;
            // never take a sibling's unsuffixed slug
            while natural.contains(slug.as_str()) {
                slug = format!("{base}-{suffix}");
                suffix += 1;
            }
        }
        taken.insert(slug.clone());
        node.slug = slug;
        assign_slugs(&mut node.children);
    }
}

fn article_node(dto: ArticleTypeDto) -> CategoryNode {
    CategoryNode {
        id: CategoryId(dto.id),
        name: dto.name,
        description: dto.description,
        slug: String::new(),
        children: Vec::new(),
    }
}

fn sub_node(dto: SubCategoryDto) -> CategoryNode {
    CategoryNode {
        id: CategoryId(dto.id),
        name: dto.name,
        description: dto.description,
        slug: String::new(),
        children: dto.article_types.into_iter().map(article_node).collect(),
    }
}

fn master_node(dto: MasterCategoryDto) -> CategoryNode {
    CategoryNode {
        id: CategoryId(dto.id),
        name: dto.name,
        description: dto.description,
        slug: String::new(),
        children: dto.sub_categories.into_iter().map(sub_node).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf(id: u64, name: &str) -> CategoryNode {
        CategoryNode {
            id: CategoryId(id),
            name: name.to_string(),
            description: None,
            slug: String::new(),
            children: Vec::new(),
        }
    }

    fn branch(id: u64, name: &str, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            children,
            ..leaf(id, name)
        }
    }

    fn sample() -> CategoryTree {
        CategoryTree::new(vec![
            branch(
                1,
                "Apparel",
                vec![
                    branch(10, "Topwear", vec![leaf(100, "T-Shirts"), leaf(101, "Shirts")]),
                    branch(11, "Bottomwear", vec![leaf(110, "Jeans")]),
                ],
            ),
            branch(
                2,
                "Footwear",
                vec![branch(20, "Shoes", vec![leaf(200, "Casual Shoes")])],
            ),
        ])
    }

    #[test]
    fn resolves_each_level() {
        let tree = sample();
        assert_eq!(
            tree.resolve(&["apparel"]),
            Some(CategoryPath::master(CategoryId(1)))
        );
        assert_eq!(
            tree.resolve(&["apparel", "topwear", "t-shirts"]),
            Some(CategoryPath::article_type(
                CategoryId(1),
                CategoryId(10),
                CategoryId(100)
            ))
        );
    }

    #[test]
    fn fails_closed() {
        let tree = sample();
        assert_eq!(tree.resolve(&["apparel", "nope", "jeans"]), None);
        assert_eq!(tree.resolve(&["apparel", "topwear", "jeans"]), None);
        assert_eq!(tree.resolve::<&str>(&[]), None);
        assert_eq!(tree.resolve(&["a", "b", "c", "d"]), None);
    }

    #[test]
    fn reverse_lookups() {
        let tree = sample();
        let path = tree.resolve(&["footwear", "shoes", "casual-shoes"]).unwrap();
        assert_eq!(tree.name(&path), Some("Casual Shoes"));
        assert_eq!(
            tree.route_slugs(&path).unwrap(),
            vec!["footwear", "shoes", "casual-shoes"]
        );
        let crumbs = tree.breadcrumb(&path).unwrap();
        assert_eq!(
            crumbs.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Footwear", "Shoes", "Casual Shoes"]
        );
        assert_eq!(path.ids(), vec![CategoryId(2), CategoryId(20), CategoryId(200)]);
    }

    #[test]
    fn description_falls_back_to_ancestor() {
        let mut master = branch(1, "Apparel", vec![leaf(10, "Topwear")]);
        master.description = Some("Clothing for everyone".into());
        let tree = CategoryTree::new(vec![master]);
        let path = CategoryPath::sub(CategoryId(1), CategoryId(10));
        assert_eq!(tree.description(&path), Some("Clothing for everyone"));
    }

    #[test]
    fn colliding_siblings_get_suffixes() {
        let tree = CategoryTree::new(vec![
            leaf(1, "Shoes"),
            leaf(2, "shoes!"),
            leaf(3, "Shoes-2"),
            leaf(4, "SHOES"),
        ]);
        let slugs: Vec<_> = tree.masters().iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, vec!["shoes", "shoes-3", "shoes-2", "shoes-4"]);
        assert_eq!(tree.master_id_by_slug("shoes-3"), Some(CategoryId(2)));
    }

    #[test]
    fn same_name_under_different_parents_is_not_a_collision() {
        let tree = CategoryTree::new(vec![
            branch(1, "Men", vec![leaf(10, "Shoes")]),
            branch(2, "Women", vec![leaf(20, "Shoes")]),
        ]);
        assert_eq!(
            tree.sub_id_by_slug(CategoryId(2), "shoes"),
            Some(CategoryId(20))
        );
    }

    #[test]
    fn builds_from_menu_json() {
        let json = r#"{"categories":[{"id":1,"name":"Accessories","sub_categories":[
            {"id":5,"name":"Bags","article_types":[{"id":9,"name":"Handbags"}]}]}]}"#;
        let menu: CategoryMenu = serde_json::from_str(json).unwrap();
        let tree = CategoryTree::from_menu(menu);
        assert_eq!(
            tree.article_type_id_by_slug(CategoryId(1), CategoryId(5), "handbags"),
            Some(CategoryId(9))
        );
    }
}
