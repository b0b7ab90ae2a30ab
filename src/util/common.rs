use std::rc::Rc;

pub type Arr<T> = Rc<[T]>;
