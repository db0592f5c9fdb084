//! Typed scalar descriptors
//!
//! Each descriptor binds one tag (or root attribute) of an entity's
//! document. Every `get` and `set` refreshes the entity through its store
//! first. Descriptors are plain constants; see [`crate::schema`].

use super::resolver::Region;
use crate::dom::NodeId;
use crate::entity::{Entity, EntityKind, EntityRef};
use crate::error::{BindError, Result};

/// Child `tag` of the descriptor's root, if present
fn find(region: &mut Region<'_>, nesting: &[&str], tag: &str) -> Option<NodeId> {
    let root = region.resolve(nesting);
    region.child(root, tag)
}

/// Child `tag` of the descriptor's root, appended if absent
fn find_or_create(region: &mut Region<'_>, nesting: &[&str], tag: &str) -> NodeId {
    let root = region.resolve(nesting);
    region.child_or_append(root, tag)
}

fn parse_integer(text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| BindError::ValueConversion {
        text: text.to_string(),
        target: "integer",
    })
}

/// Text of a child element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDescriptor {
    tag: &'static str,
    nesting: &'static [&'static str],
}

impl StringDescriptor {
    pub const fn new(tag: &'static str) -> Self {
        StringDescriptor { tag, nesting: &[] }
    }

    pub const fn nested(self, nesting: &'static [&'static str]) -> Self {
        StringDescriptor { nesting, ..self }
    }

    /// `None` when the element is absent or empty
    pub fn get(&self, entity: &mut Entity) -> Result<Option<String>> {
        entity.with_region(|region| Ok(find(region, self.nesting, self.tag).and_then(|node| region.text(node))))
    }

    /// Write the text, creating the element if needed
    pub fn set(&self, entity: &mut Entity, value: &str) -> Result<()> {
        entity.with_region(|region| {
            let node = find_or_create(region, self.nesting, self.tag);
            region.doc.set_text(node, Some(value));
            Ok(())
        })
    }
}

/// Base-10 integer text of a child element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerDescriptor {
    inner: StringDescriptor,
}

impl IntegerDescriptor {
    pub const fn new(tag: &'static str) -> Self {
        IntegerDescriptor {
            inner: StringDescriptor::new(tag),
        }
    }

    pub fn get(&self, entity: &mut Entity) -> Result<Option<i64>> {
        self.inner.get(entity)?.as_deref().map(parse_integer).transpose()
    }

    pub fn set(&self, entity: &mut Entity, value: i64) -> Result<()> {
        self.inner.set(entity, &value.to_string())
    }
}

/// `true`/`false` text of a child element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanDescriptor {
    inner: StringDescriptor,
}

impl BooleanDescriptor {
    pub const fn new(tag: &'static str) -> Self {
        BooleanDescriptor {
            inner: StringDescriptor::new(tag),
        }
    }

    /// Case-insensitive; anything but `true` reads as false
    pub fn get(&self, entity: &mut Entity) -> Result<Option<bool>> {
        Ok(self.inner.get(entity)?.map(|text| text.eq_ignore_ascii_case("true")))
    }

    pub fn set(&self, entity: &mut Entity, value: bool) -> Result<()> {
        self.inner.set(entity, if value { "true" } else { "false" })
    }
}

/// Attribute of the root element; absence is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringAttributeDescriptor {
    attribute: &'static str,
}

impl StringAttributeDescriptor {
    pub const fn new(attribute: &'static str) -> Self {
        StringAttributeDescriptor { attribute }
    }

    pub fn get(&self, entity: &mut Entity) -> Result<String> {
        entity.with_region(|region| region.require_attribute(region.doc.root(), self.attribute))
    }

    pub fn set(&self, entity: &mut Entity, value: &str) -> Result<()> {
        entity.with_region(|region| {
            let root = region.doc.root();
            region.doc.set_attribute(root, self.attribute, value);
            Ok(())
        })
    }
}

/// Integer attribute of the root element; absence is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerAttributeDescriptor {
    inner: StringAttributeDescriptor,
}

impl IntegerAttributeDescriptor {
    pub const fn new(attribute: &'static str) -> Self {
        IntegerAttributeDescriptor {
            inner: StringAttributeDescriptor::new(attribute),
        }
    }

    pub fn get(&self, entity: &mut Entity) -> Result<i64> {
        parse_integer(&self.inner.get(entity)?)
    }
}

/// Reference to another entity through a child's `uri` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    tag: &'static str,
    kind: EntityKind,
}

impl EntityDescriptor {
    pub const fn new(tag: &'static str, kind: EntityKind) -> Self {
        EntityDescriptor { tag, kind }
    }

    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// `None` when the child is absent; a child without `uri` is an error
    pub fn get(&self, entity: &mut Entity) -> Result<Option<EntityRef>> {
        entity.with_region(|region| {
            find(region, &[], self.tag)
                .map(|node| region.require_attribute(node, "uri"))
                .transpose()
                .map(|uri| uri.map(|uri| EntityRef::new(self.kind, uri)))
        })
    }

    pub fn set(&self, entity: &mut Entity, value: &EntityRef) -> Result<()> {
        if value.uri().is_empty() {
            return Err(BindError::missing_attribute(value.kind().as_str(), "uri"));
        }
        if value.kind() != self.kind {
            return Err(BindError::mismatch(self.tag, self.kind.as_str(), value.kind().as_str()));
        }
        entity.with_region(|region| {
            let node = find_or_create(region, &[], self.tag);
            region.doc.set_attribute(node, "uri", value.uri());
            Ok(())
        })
    }
}

/// One axis of a container type's well grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub is_alpha: bool,
    pub offset: i64,
    pub size: i64,
}

/// Where an artifact sits: a container and a coordinate such as `A:1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub container: EntityRef,
    pub value: Option<String>,
}

fn required_child(region: &Region<'_>, parent: NodeId, tag: &str) -> Result<NodeId> {
    region.child(parent, tag).ok_or_else(|| BindError::MissingElement {
        parent: region.doc.name(parent).to_string(),
        tag: tag.to_string(),
    })
}

fn required_text(region: &Region<'_>, parent: NodeId, tag: &str) -> Result<String> {
    let node = required_child(region, parent, tag)?;
    Ok(region.text(node).unwrap_or_default())
}

impl Location {
    /// Decode a `location`-shaped element: `container` with a `uri` plus `value`
    pub(crate) fn decode(region: &Region<'_>, node: NodeId) -> Result<Location> {
        let container = required_child(region, node, "container")?;
        let uri = region.require_attribute(container, "uri")?;
        let value = region.child(node, "value").and_then(|v| region.text(v));
        Ok(Location {
            container: EntityRef::new(EntityKind::Container, uri),
            value,
        })
    }
}

/// Read-only `is-alpha`/`offset`/`size` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionDescriptor {
    tag: &'static str,
}

impl DimensionDescriptor {
    pub const fn new(tag: &'static str) -> Self {
        DimensionDescriptor { tag }
    }

    pub fn get(&self, entity: &mut Entity) -> Result<Option<Dimension>> {
        entity.with_region(|region| {
            let Some(node) = find(region, &[], self.tag) else {
                return Ok(None);
            };
            Ok(Some(Dimension {
                is_alpha: required_text(region, node, "is-alpha")?.eq_ignore_ascii_case("true"),
                offset: parse_integer(&required_text(region, node, "offset")?)?,
                size: parse_integer(&required_text(region, node, "size")?)?,
            }))
        })
    }
}

/// Read-only container location of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationDescriptor {
    tag: &'static str,
}

impl LocationDescriptor {
    pub const fn new(tag: &'static str) -> Self {
        LocationDescriptor { tag }
    }

    pub fn get(&self, entity: &mut Entity) -> Result<Option<Location>> {
        entity.with_region(|region| {
            find(region, &[], self.tag)
                .map(|node| Location::decode(region, node))
                .transpose()
        })
    }
}

/// Identifier of an entity in an external system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalId {
    pub id: Option<String>,
    pub uri: Option<String>,
}

/// Read-only `ri:externalid` children of the root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalIdListDescriptor;

impl ExternalIdListDescriptor {
    pub const fn new() -> Self {
        ExternalIdListDescriptor
    }

    pub fn get(&self, entity: &mut Entity) -> Result<Vec<ExternalId>> {
        entity.with_region(|region| {
            let root = region.doc.root();
            Ok(region
                .children(root, "ri:externalid")
                .into_iter()
                .map(|node| ExternalId {
                    id: region.doc.attribute(node, "id").map(str::to_string),
                    uri: region.doc.attribute(node, "uri").map(str::to_string),
                })
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const ARTIFACT: &str = r#"<art:artifact xmlns:art="http://genologics.com/ri/artifact" xmlns:ri="http://genologics.com/ri" limsid="2-1" index="4">
    <name>Lib 1</name>
    <qc-flag>PASSED</qc-flag>
    <working-flag>True</working-flag>
    <volume>n/a</volume>
    <occupied-wells>12</occupied-wells>
    <parent-process uri="http://lims/api/v2/processes/24-1"/>
    <broken-ref/>
    <location>
        <container uri="http://lims/api/v2/containers/27-1" limsid="27-1"/>
        <value>A:1</value>
    </location>
    <x-dimension><is-alpha>true</is-alpha><offset>0</offset><size>8</size></x-dimension>
    <y-dimension><is-alpha>false</is-alpha><size>12</size></y-dimension>
    <ri:externalid id="EXT-1" uri="http://ext/1"/>
    <ri:externalid id="EXT-2"/>
</art:artifact>"#;

    fn artifact() -> Entity {
        Entity::from_document(
            EntityKind::Artifact,
            "http://lims/api/v2/artifacts/2-1",
            Document::parse_str(ARTIFACT).unwrap(),
        )
    }

    #[test]
    fn test_string_get_set() {
        let mut entity = artifact();
        let name = StringDescriptor::new("name");
        assert_eq!(name.get(&mut entity).unwrap().as_deref(), Some("Lib 1"));
        name.set(&mut entity, "Lib 2").unwrap();
        assert_eq!(name.get(&mut entity).unwrap().as_deref(), Some("Lib 2"));

        let missing = StringDescriptor::new("description");
        assert_eq!(missing.get(&mut entity).unwrap(), None);
        missing.set(&mut entity, "new").unwrap();
        assert_eq!(missing.get(&mut entity).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_nested_string_creates_path() {
        let mut entity = artifact();
        let nested = StringDescriptor::new("value").nested(&["details", "inner"]);
        nested.set(&mut entity, "deep").unwrap();
        nested.set(&mut entity, "deeper").unwrap();
        assert_eq!(nested.get(&mut entity).unwrap().as_deref(), Some("deeper"));
        assert_eq!(entity.to_xml().unwrap().matches("<details>").count(), 1);
    }

    #[test]
    fn test_integer() {
        let mut entity = artifact();
        let wells = IntegerDescriptor::new("occupied-wells");
        assert_eq!(wells.get(&mut entity).unwrap(), Some(12));
        wells.set(&mut entity, 96).unwrap();
        assert_eq!(wells.get(&mut entity).unwrap(), Some(96));

        let volume = IntegerDescriptor::new("volume");
        assert!(matches!(volume.get(&mut entity), Err(BindError::ValueConversion { .. })));
        assert_eq!(IntegerDescriptor::new("absent").get(&mut entity).unwrap(), None);
    }

    #[test]
    fn test_boolean() {
        let mut entity = artifact();
        let flag = BooleanDescriptor::new("working-flag");
        assert_eq!(flag.get(&mut entity).unwrap(), Some(true));
        flag.set(&mut entity, false).unwrap();
        assert_eq!(flag.get(&mut entity).unwrap(), Some(false));
        assert!(entity.to_xml().unwrap().contains("<working-flag>false</working-flag>"));
        assert_eq!(BooleanDescriptor::new("absent").get(&mut entity).unwrap(), None);
    }

    #[test]
    fn test_attributes() {
        let mut entity = artifact();
        let limsid = StringAttributeDescriptor::new("limsid");
        assert_eq!(limsid.get(&mut entity).unwrap(), "2-1");
        limsid.set(&mut entity, "2-2").unwrap();
        assert_eq!(limsid.get(&mut entity).unwrap(), "2-2");
        assert_eq!(IntegerAttributeDescriptor::new("index").get(&mut entity).unwrap(), 4);
        assert!(matches!(
            StringAttributeDescriptor::new("missing").get(&mut entity),
            Err(BindError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_entity_reference() {
        let mut entity = artifact();
        let parent = EntityDescriptor::new("parent-process", EntityKind::Process);
        let process = parent.get(&mut entity).unwrap().unwrap();
        assert_eq!(process.kind(), EntityKind::Process);
        assert_eq!(process.id(), "24-1");

        let other = EntityRef::new(EntityKind::Process, "http://lims/api/v2/processes/24-9");
        parent.set(&mut entity, &other).unwrap();
        assert_eq!(parent.get(&mut entity).unwrap(), Some(other));

        let sample = EntityRef::new(EntityKind::Sample, "http://lims/api/v2/samples/S1");
        assert!(matches!(parent.set(&mut entity, &sample), Err(BindError::TypeMismatch { .. })));
        let unsaved = EntityRef::new(EntityKind::Process, "");
        assert!(matches!(parent.set(&mut entity, &unsaved), Err(BindError::MissingAttribute { .. })));

        let broken = EntityDescriptor::new("broken-ref", EntityKind::Sample);
        assert!(matches!(broken.get(&mut entity), Err(BindError::MissingAttribute { .. })));
        assert_eq!(EntityDescriptor::new("submitter", EntityKind::Researcher).get(&mut entity).unwrap(), None);
    }

    #[test]
    fn test_structured_readers() {
        let mut entity = artifact();
        let location = LocationDescriptor::new("location").get(&mut entity).unwrap().unwrap();
        assert_eq!(location.container.id(), "27-1");
        assert_eq!(location.value.as_deref(), Some("A:1"));

        let x = DimensionDescriptor::new("x-dimension").get(&mut entity).unwrap();
        assert_eq!(x, Some(Dimension { is_alpha: true, offset: 0, size: 8 }));
        assert!(matches!(
            DimensionDescriptor::new("y-dimension").get(&mut entity),
            Err(BindError::MissingElement { tag, .. }) if tag == "offset"
        ));
        assert_eq!(DimensionDescriptor::new("z-dimension").get(&mut entity).unwrap(), None);
    }

    #[test]
    fn test_external_ids() {
        let mut entity = artifact();
        let ids = ExternalIdListDescriptor::new().get(&mut entity).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].uri.as_deref(), Some("http://ext/1"));
        assert_eq!(ids[1], ExternalId { id: Some("EXT-2".to_string()), uri: None });
    }
}
