use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nova_types::{EnvKey, Equality, Type, TypeEnv};
use parking_lot::Mutex;

use crate::cx::SeenDecl;
use crate::RelationCx;

type ClosureCache = HashMap<(EnvKey, Type), Arc<[Type]>>;

/// Ordered supertype closures.
///
/// A closure lists a type and all of its supertypes (class types and type variables only), most
/// specialized first, with no two elements equal under the configured [`Equality`] and at most
/// one instantiation per declaration.
pub(crate) struct TypeClosureVisitor {
    equality: Equality,
    capacity: usize,
    cache: Mutex<ClosureCache>,
}

impl std::fmt::Debug for TypeClosureVisitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeClosureVisitor")
            .field("equality", &self.equality)
            .field("capacity", &self.capacity)
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl TypeClosureVisitor {
    pub(crate) fn new(equality: Equality, capacity: usize) -> Self {
        Self {
            equality,
            capacity,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub(crate) fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub(crate) fn closure(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Arc<[Type]> {
        let key = self.cache_key(cx, ty);
        if let Some(key) = key.as_ref() {
            if let Some(hit) = self.cache.lock().get(key) {
                return Arc::clone(hit);
            }
        }

        let cuts = cx.closure_cuts;
        let closure: Arc<[Type]> = self.compute(cx, ty).into();

        // Walks cut short at a cycle are not cached.
        if let Some(key) = key.filter(|_| !cx.is_exhausted() && cx.closure_cuts == cuts) {
            let mut cache = self.cache.lock();
            if cache.len() >= self.capacity {
                tracing::debug!(
                    target: "nova.types",
                    entries = cache.len(),
                    "flushing supertype closure cache"
                );
                cache.clear();
            }
            cache.insert(key, Arc::clone(&closure));
        }
        closure
    }

    /// Types mentioning per-query variables are never cached: those ids are reused by the next
    /// query.
    fn cache_key(&self, cx: &RelationCx<'_, '_>, ty: &Type) -> Option<(EnvKey, Type)> {
        if self.capacity == 0 || ty.has_context_local_vars() {
            return None;
        }
        Some((cx.env().cache_key()?, ty.clone()))
    }

    fn compute(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Vec<Type> {
        let decl = match ty {
            Type::Class(class) => SeenDecl::Class(class.def),
            Type::TypeVar(id) => SeenDecl::TypeVar(*id),
            Type::Intersection(_) => return self.walk(cx, ty),
            _ => return vec![ty.clone()],
        };
        // Cyclic declarations: a declaration already being walked contributes only itself.
        if !cx.closure_in_progress.insert(decl) {
            cx.closure_cuts += 1;
            return vec![ty.clone()];
        }
        let closure = self.walk(cx, ty);
        cx.closure_in_progress.remove(&decl);
        closure
    }

    fn walk(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> Vec<Type> {
        let sup = cx.supertype(ty);
        let mut closure = if matches!(ty, Type::Intersection(_)) {
            match &sup {
                Type::Class(_) | Type::TypeVar(_) => cx.closure(&sup).to_vec(),
                _ => Vec::new(),
            }
        } else {
            match &sup {
                Type::Class(_) => {
                    let base = cx.closure(&sup);
                    self.insert(cx, &base, ty)
                }
                // A variable bounded by a variable goes first, without consulting the ordering.
                Type::TypeVar(_) => {
                    let base = cx.closure(&sup);
                    let mut out = Vec::with_capacity(base.len() + 1);
                    out.push(ty.clone());
                    out.extend(base.iter().cloned());
                    out
                }
                _ => vec![ty.clone()],
            }
        };
        for interface in cx.interfaces(ty) {
            let other = cx.closure(&interface);
            closure = self.union(cx, &closure, &other);
        }
        closure
    }

    fn same(&self, a: &Type, b: &Type) -> bool {
        self.equality.types_equal(a, b)
    }

    /// Inserts `ty` into an ordered closure.
    pub(crate) fn insert(&self, cx: &mut RelationCx<'_, '_>, closure: &[Type], ty: &Type) -> Vec<Type> {
        let mut out = Vec::with_capacity(closure.len() + 1);
        let mut rest = closure;
        loop {
            let Some((head, tail)) = rest.split_first() else {
                out.push(ty.clone());
                return out;
            };
            if self.same(ty, head) || same_declaration(ty, head) {
                out.extend(rest.iter().cloned());
                return out;
            }
            if cx.precedes(ty, head) {
                out.push(ty.clone());
                out.extend(rest.iter().cloned());
                return out;
            }
            out.push(head.clone());
            rest = tail;
        }
    }

    /// Merges two ordered closures.
    pub(crate) fn union(&self, cx: &mut RelationCx<'_, '_>, a: &[Type], b: &[Type]) -> Vec<Type> {
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut a, mut b) = (a, b);
        loop {
            match (a.split_first(), b.split_first()) {
                (None, _) => {
                    out.extend(b.iter().cloned());
                    return out;
                }
                (_, None) => {
                    out.extend(a.iter().cloned());
                    return out;
                }
                (Some((a_head, a_tail)), Some((b_head, b_tail))) => {
                    if self.same(a_head, b_head) || same_declaration(a_head, b_head) {
                        // One instantiation per declaration; `a`'s wins.
                        out.push(a_head.clone());
                        a = a_tail;
                        b = b_tail;
                    } else if cx.precedes(a_head, b_head) {
                        out.push(a_head.clone());
                        a = a_tail;
                    } else if cx.precedes(b_head, a_head) {
                        out.push(b_head.clone());
                        b = b_tail;
                    } else {
                        // Unrelated heads keep `a`'s order.
                        out.push(a_head.clone());
                        a = a_tail;
                    }
                }
            }
        }
    }

    /// The minimal elements of a closure: classes first, then interfaces.
    pub(crate) fn closure_min(&self, cx: &mut RelationCx<'_, '_>, closure: &[Type]) -> Vec<Type> {
        let mut classes = Vec::new();
        let mut interfaces = Vec::new();
        let mut skip: HashSet<Type> = HashSet::new();
        for (index, current) in closure.iter().enumerate() {
            let rest = &closure[index + 1..];
            let mut keep = !skip.contains(current);
            if keep && matches!(current, Type::TypeVar(_)) {
                // A variable is not minimal if something later is a subtype of it.
                keep = !rest.iter().any(|later| cx.is_subtype_no_capture(later, current));
            }
            if !keep {
                continue;
            }
            if cx.is_interface(current) {
                interfaces.push(current.clone());
            } else {
                classes.push(current.clone());
            }
            for later in rest {
                if cx.is_subtype_no_capture(current, later) {
                    skip.insert(later.clone());
                }
            }
        }
        classes.extend(interfaces);
        classes
    }
}

fn same_declaration(a: &Type, b: &Type) -> bool {
    matches!((a, b), (Type::Class(x), Type::Class(y)) if x.def == y.def)
}

/// The total order used to build closures.
#[derive(Debug, Default)]
pub(crate) struct PrecedesPredicate;

impl PrecedesPredicate {
    /// Whether `a` must come before `b`: type variables come before everything else (and before
    /// their supertypes), classes of higher rank come first, ties broken by qualified name.
    pub(crate) fn visit(&self, cx: &mut RelationCx<'_, '_>, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::TypeVar(x), Type::TypeVar(y)) => x != y && cx.is_subtype_no_capture(a, b),
            (Type::TypeVar(_), _) => true,
            (Type::Class(x), Type::Class(y)) => {
                if x.def == y.def {
                    return false;
                }
                let (a_rank, b_rank) = (cx.rank(a), cx.rank(b));
                b_rank < a_rank
                    || (b_rank == a_rank && cx.qualified_name(y.def) < cx.qualified_name(x.def))
            }
            _ => false,
        }
    }

    /// Length of the longest supertype path from a class to `Object`.
    pub(crate) fn rank(&self, cx: &mut RelationCx<'_, '_>, ty: &Type) -> u32 {
        match ty {
            Type::Class(class) => {
                if class.def == cx.well_known().object {
                    return 0;
                }
                if let Some(rank) = cx.ranks.get(&class.def) {
                    return *rank;
                }
                // Cyclic declarations: the class under computation contributes nothing.
                if !cx.rank_in_progress.insert(class.def) {
                    return 0;
                }
                let generic = nova_types::generic_self_type(cx.decls(), class.def);
                let sup = cx.supertype(&generic);
                let mut rank = match sup {
                    Type::NoType(_) | Type::Error => 0,
                    _ => cx.rank(&sup),
                };
                for interface in cx.interfaces(&generic) {
                    rank = rank.max(cx.rank(&interface));
                }
                cx.rank_in_progress.remove(&class.def);
                let rank = rank + 1;
                cx.ranks.insert(class.def, rank);
                rank
            }
            Type::TypeVar(id) => {
                let mut seen = HashSet::from([*id]);
                let mut bound = cx.upper_bound(*id);
                while let Type::TypeVar(next) = bound {
                    if !seen.insert(next) {
                        return 0;
                    }
                    bound = cx.upper_bound(next);
                }
                cx.rank(&bound)
            }
            Type::Intersection(bounds) => bounds.iter().map(|b| cx.rank(b)).max().unwrap_or(0),
            _ => 0,
        }
    }
}
