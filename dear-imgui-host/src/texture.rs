//! Texture translation between draw commands and host resources.
//!
//! Draw commands carry a [`TextureId`]; the host renders with its own
//! resource handles. The [`TextureRegistry`] maps one to the other. Index 0 is
//! reserved for a placeholder resource so that commands without an explicit
//! texture still resolve to something drawable.

use std::collections::HashMap;

use crate::error::{ImGuiHostError, ImGuiHostResult};
use crate::math::{ColorU32, unpack_color};

/// Name of the 2x2 white placeholder registered at index 0.
pub const PLAIN_TEXTURE_NAME: &str = "ImGuiModule_Plain";

/// Name of the font atlas texture.
pub const FONT_ATLAS_TEXTURE_NAME: &str = "ImGuiModule_FontAtlas";

/// Name of the texture shown in place of unresolvable references.
pub const ERROR_TEXTURE_NAME: &str = "ImGuiModule_Error";

const INDEX_BITS: u32 = usize::BITS / 2;
const INDEX_MASK: usize = (1 << INDEX_BITS) - 1;
const GENERATION_MASK: usize = usize::MAX >> INDEX_BITS;

/// Handle to a registry slot, carried by draw commands.
///
/// The low half of the value is the slot index, the high half the slot's
/// generation. Releasing a texture bumps the generation, so ids kept past
/// [`TextureRegistry::unregister`] stop resolving even after the slot is
/// reused.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TextureId(usize);

impl TextureId {
    /// Handle from its raw value. Values below the index range address the
    /// first generation of that slot.
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline]
    const fn from_parts(index: usize, generation: usize) -> Self {
        Self((index & INDEX_MASK) | ((generation & GENERATION_MASK) << INDEX_BITS))
    }

    /// Raw value as stored in draw commands
    #[inline]
    pub const fn id(self) -> usize {
        self.0
    }

    /// Registry slot
    #[inline]
    pub const fn index(self) -> usize {
        self.0 & INDEX_MASK
    }

    #[inline]
    pub const fn generation(self) -> usize {
        self.0 >> INDEX_BITS
    }

    /// Handle of the placeholder slot
    #[inline]
    pub const fn null() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for TextureId {
    #[inline]
    fn from(id: usize) -> Self {
        TextureId(id)
    }
}

/// How [`TextureRegistry::register`] treats an existing entry with the same name.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TextureRegistration {
    /// Fail with [`ImGuiHostError::TextureNameInUse`].
    #[default]
    Unique,
    /// Replace the resource in place, keeping the id.
    AllowReplace,
}

/// Creates host texture resources from RGBA8 pixels.
pub trait TextureHost {
    /// Host resource handle stored in the registry
    type Resource;

    fn create_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> ImGuiHostResult<Self::Resource>;
}

/// CPU-side texture, used by hosts that upload pixels themselves and by the
/// headless backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl CpuTexture {
    /// Texture filled with a single packed color
    pub fn solid(name: impl Into<String>, width: u32, height: u32, color: ColorU32) -> Self {
        let texel = unpack_color(color);
        let pixels = texel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            name: name.into(),
            width,
            height,
            pixels,
        }
    }

    /// RGBA8 texel at `(x, y)`
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// [`TextureHost`] that keeps pixels in memory.
#[derive(Debug, Default)]
pub struct CpuTextureHost {
    created: usize,
}

impl CpuTextureHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures created so far
    pub fn created_count(&self) -> usize {
        self.created
    }
}

impl TextureHost for CpuTextureHost {
    type Resource = CpuTexture;

    fn create_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> ImGuiHostResult<CpuTexture> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ImGuiHostError::texture_operation(format!(
                "'{}' expects {} bytes of RGBA8 data, got {}",
                name,
                expected,
                rgba.len()
            )));
        }
        self.created += 1;
        Ok(CpuTexture {
            name: name.to_owned(),
            width,
            height,
            pixels: rgba.to_vec(),
        })
    }
}

#[derive(Debug)]
struct TextureEntry<T> {
    name: String,
    resource: T,
}

#[derive(Debug)]
struct Slot<T> {
    generation: usize,
    entry: Option<TextureEntry<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            generation: 0,
            entry: None,
        }
    }
}

/// Registry of host texture resources keyed by name and index.
#[derive(Debug)]
pub struct TextureRegistry<T> {
    slots: Vec<Slot<T>>,
    by_name: HashMap<String, TextureId>,
    free_slots: Vec<usize>,
    error_texture: Option<TextureId>,
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TextureRegistry<T> {
    /// Creates an empty registry with index 0 reserved for the placeholder.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::empty()],
            by_name: HashMap::new(),
            free_slots: Vec::new(),
            error_texture: None,
        }
    }

    /// Installs the placeholder resource at index 0.
    pub fn set_placeholder(&mut self, name: impl Into<String>, resource: T) -> TextureId {
        let name = name.into();
        if let Some(previous) = self.slots[0].entry.take() {
            self.by_name.remove(&previous.name);
        }
        self.by_name.insert(name.clone(), TextureId::null());
        self.slots[0].entry = Some(TextureEntry { name, resource });
        TextureId::null()
    }

    pub fn has_placeholder(&self) -> bool {
        self.slots[0].entry.is_some()
    }

    /// Registers a resource under a name and returns its id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        resource: T,
        registration: TextureRegistration,
    ) -> ImGuiHostResult<TextureId> {
        let name = name.into();
        if let Some(&existing) = self.by_name.get(&name) {
            return match registration {
                TextureRegistration::Unique => Err(ImGuiHostError::texture_name_in_use(name)),
                TextureRegistration::AllowReplace => {
                    if let Some(entry) = self.slots[existing.index()].entry.as_mut() {
                        entry.resource = resource;
                    }
                    host_debug!("Replaced texture '{}' at index {}", name, existing.index());
                    Ok(existing)
                }
            };
        }

        let entry = TextureEntry {
            name: name.clone(),
            resource,
        };
        let index = match self.free_slots.pop() {
            Some(index) => {
                self.slots[index].entry = Some(entry);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                self.slots.len() - 1
            }
        };
        let id = TextureId::from_parts(index, self.slots[index].generation);
        host_debug!("Registered texture '{}' at index {}", name, index);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Releases a texture. Invalid or stale ids and the placeholder are ignored.
    pub fn unregister(&mut self, id: TextureId) -> bool {
        if id.is_null() || self.entry(id).is_none() {
            host_trace!("Ignoring release of unknown texture {:?}", id);
            return false;
        }
        let slot = &mut self.slots[id.index()];
        let Some(entry) = slot.entry.take() else {
            return false;
        };
        slot.generation = (slot.generation + 1) & GENERATION_MASK;
        self.by_name.remove(&entry.name);
        self.free_slots.push(id.index());
        if self.error_texture == Some(id) {
            self.error_texture = None;
        }
        true
    }

    pub fn find(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.entry(id).map(|entry| entry.name.as_str())
    }

    pub fn resource(&self, id: TextureId) -> Option<&T> {
        self.entry(id).map(|entry| &entry.resource)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.entry(id).is_some()
    }

    /// Marks a registered texture as the stand-in for unresolvable ids.
    pub fn set_error_texture(&mut self, id: TextureId) {
        debug_assert!(self.contains(id), "error texture must be registered");
        self.error_texture = Some(id);
    }

    pub fn error_texture(&self) -> Option<TextureId> {
        self.error_texture
    }

    /// Resolves an id, falling back to the error texture for unknown ids.
    pub fn try_resolve(&self, id: TextureId) -> Option<&T> {
        self.resource(id)
            .or_else(|| self.error_texture.and_then(|error| self.resource(error)))
    }

    /// Resolves an id for drawing.
    ///
    /// Index 0 maps to the placeholder. Unknown and released ids map to the
    /// error texture.
    ///
    /// # Panics
    ///
    /// Panics if the id cannot be resolved at all, which means drawing started
    /// before the placeholder and error textures were registered.
    pub fn resolve(&self, id: TextureId) -> &T {
        if let Some(resource) = self.resource(id) {
            return resource;
        }
        match self.try_resolve(id) {
            Some(resource) => {
                host_error!("Unknown texture {:?}, drawing error texture", id);
                resource
            }
            None => panic!(
                "texture index {} cannot be resolved; register the placeholder and error textures before drawing",
                id.index()
            ),
        }
    }

    /// Number of registered textures, placeholder included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &str, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|entry| {
                (
                    TextureId::from_parts(index, slot.generation),
                    entry.name.as_str(),
                    &entry.resource,
                )
            })
        })
    }

    fn entry(&self, id: TextureId) -> Option<&TextureEntry<T>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entry.as_ref())
    }
}
