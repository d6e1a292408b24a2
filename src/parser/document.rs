/*!
Access to registry XML exports.

The registry answers searches with
`<whois-resources><objects><object type="..">...</object></objects></whois-resources>`; the
helpers here walk that tree for aut-num policy attributes and route objects.
*/
use crate::error::PolicyError;
use crate::models::RouteObject;
use ipnet::IpNet;
use log::warn;
use roxmltree::{Document, Node};
use std::str::FromStr;

/// A `name`/`value` attribute of a registry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryAttribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// All `<object type="{object_type}">` elements of the document, in document order.
fn objects<'a, 'input>(doc: &'a Document<'input>, object_type: &'a str) -> Vec<Node<'a, 'input>> {
    let root = doc.root_element();
    let containers: Vec<Node> = match root.tag_name().name() {
        "objects" => vec![root],
        _ => child_elements(root, "objects").collect(),
    };
    containers
        .into_iter()
        .flat_map(|c| child_elements(c, "object"))
        .filter(|o| o.attribute("type") == Some(object_type))
        .collect()
}

fn attributes<'a>(parent: Node<'a, '_>) -> Vec<RegistryAttribute<'a>> {
    child_elements(parent, "attribute")
        .filter_map(|a| {
            Some(RegistryAttribute {
                name: a.attribute("name")?,
                value: a.attribute("value")?,
            })
        })
        .collect()
}

/// Attributes of every aut-num object in the document, in document order.
pub fn autnum_attributes<'a>(doc: &'a Document) -> Vec<RegistryAttribute<'a>> {
    objects(doc, "aut-num")
        .into_iter()
        .flat_map(|o| child_elements(o, "attributes"))
        .flat_map(attributes)
        .collect()
}

/// Reads `route` and/or `route6` objects from a registry search result.
///
/// Objects without both a prefix and an origin, or whose prefix does not parse, are skipped.
pub fn extract_routes(xml: &str, ipv4: bool, ipv6: bool) -> Result<Vec<RouteObject>, PolicyError> {
    let doc = Document::parse(xml)?;
    let mut routes = vec![];

    let kinds = [("route", ipv4), ("route6", ipv6)];
    for (object_type, _) in kinds.iter().filter(|(_, enabled)| *enabled) {
        for key in objects(&doc, object_type)
            .into_iter()
            .flat_map(|o| child_elements(o, "primary-key"))
        {
            let mut prefix = None;
            let mut origin = None;
            for attribute in attributes(key) {
                match attribute.name {
                    "origin" => origin = Some(attribute.value),
                    name if name == *object_type => prefix = Some(attribute.value),
                    _ => {}
                }
            }

            let (prefix, origin) = match (prefix, origin) {
                (Some(p), Some(o)) => (p, o),
                _ => {
                    warn!(
                        "incomplete {} object: prefix {:?} origin {:?}",
                        object_type, prefix, origin
                    );
                    continue;
                }
            };
            match IpNet::from_str(prefix.trim()) {
                Ok(net) if matches!(net, IpNet::V6(_)) == (*object_type == "route6") => {
                    routes.push(RouteObject::new(net, origin.trim()));
                }
                _ => warn!("invalid {} prefix: {}", object_type, prefix),
            }
        }
    }
    Ok(routes)
}
